//! `kubesmith validate` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use kubesmith_policy::PolicyEngine;

#[derive(Args)]
pub struct ValidateArgs {
    /// Directory containing generated manifests
    #[arg(short, long)]
    pub manifests: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    let engine = PolicyEngine::new();
    let report = engine
        .validate_dir(&args.manifests)
        .with_context(|| format!("validating {}", args.manifests.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    // Invalid report becomes the aggregate failure with every error in
    // the payload.
    report.ensure_valid()?;
    Ok(())
}
