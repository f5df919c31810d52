//! # kubesmith_policy
//!
//! Manifest parsing and policy validation.
//!
//! Reads a directory of generated manifests, decodes each file as a
//! multi-document YAML stream, and checks every document against the
//! organization's naming, storage and security policies. All
//! violations are accumulated into one [`ValidationReport`]; nothing
//! short-circuits on the first failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kubesmith_policy::PolicyEngine;
//! use std::path::Path;
//!
//! let engine = PolicyEngine::new();
//! let report = engine.validate_dir(Path::new("clusters/homelab/apps/blog")).unwrap();
//! report.ensure_valid().unwrap();
//! ```

pub mod engine;
pub mod error;
pub mod parser;
pub mod report;
pub mod rules;

pub use engine::PolicyEngine;
pub use error::{PolicyError, PolicyResult};
pub use parser::{ManifestDocument, ManifestParser};
pub use report::{ReportBuilder, Severity, ValidationReport, Violation};
pub use rules::{NamingPolicy, StoragePolicy};
