//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod validate;

pub use generate::GenerateArgs;
pub use validate::ValidateArgs;

/// Kubesmith - manifest generation and policy validation for GitOps
/// app deployments.
#[derive(Parser)]
#[command(name = "kubesmith", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Kubernetes manifests from a deployment request
    Generate(GenerateArgs),
    /// Validate generated manifests against deployment policies
    Validate(ValidateArgs),
}
