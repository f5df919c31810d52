//! # kubesmith_gen
//!
//! Manifest generation engine.
//!
//! Expands one validated deployment spec into its manifest bundle:
//! the three base documents, the pattern-specific storage claim, the
//! backup document when snapshots are enabled, and the kustomization
//! aggregation document last.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kubesmith_gen::{GeneratorConfig, ManifestGenerator};
//! use kubesmith_spec::DeploymentRequest;
//! use std::path::Path;
//!
//! let spec = DeploymentRequest::from_file(Path::new("deploy.yaml"))
//!     .and_then(DeploymentRequest::validate)
//!     .unwrap();
//!
//! let generator = ManifestGenerator::new(GeneratorConfig::for_templates("templates/skeleton"));
//! let manifests = generator.generate(&spec, Path::new("clusters/homelab/apps")).unwrap();
//! println!("{}", manifests.summary);
//! ```

pub mod error;
pub mod generator;
pub mod plan;
pub mod renderer;

pub use error::{GenError, GenResult};
pub use generator::{GeneratedManifests, GeneratorConfig, ManifestGenerator};
pub use plan::{ArtifactBinding, ArtifactBindings, GenerationPlan};
pub use renderer::TemplateRenderer;
