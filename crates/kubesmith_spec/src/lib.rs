//! # kubesmith_spec
//!
//! Deployment request model and template context derivation.
//!
//! A raw [`DeploymentRequest`] is validated into an immutable
//! [`DeploymentSpec`] with defaults applied, and the spec is then
//! flattened into the [`TemplateContext`] consumed by manifest
//! rendering.
//!
//! ## Example
//!
//! ```rust
//! use kubesmith_spec::{ContextDefaults, DeploymentRequest, TemplateContext};
//!
//! let request = DeploymentRequest {
//!     app_name: Some("blog".into()),
//!     container_image: Some("blog:v1".into()),
//!     storage_pattern: Some("ephemeral".into()),
//!     ingress_pattern: Some("internal-only".into()),
//!     backup_strategy: Some("none".into()),
//!     operator_id: Some("alice".into()),
//!     ..Default::default()
//! };
//!
//! let spec = request.validate().unwrap();
//! let context = TemplateContext::build(&spec, &ContextDefaults::default());
//! assert!(!context.has_volume);
//! ```

pub mod context;
pub mod error;
pub mod models;

pub use context::{ContextDefaults, TemplateContext};
pub use error::{SpecError, SpecResult};
pub use models::{
    BackupStrategy, DeploymentRequest, DeploymentSpec, IngressPattern, StoragePattern,
    DEFAULT_RETENTION_DAYS, DEFAULT_STORAGE_SIZE,
};
