//! `kubesmith generate` command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use kubesmith_gen::{GeneratorConfig, ManifestGenerator};
use kubesmith_spec::DeploymentRequest;

#[derive(Args)]
pub struct GenerateArgs {
    /// Deployment request file (YAML)
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory containing the manifest templates
    #[arg(short, long, env = "KUBESMITH_TEMPLATES")]
    pub templates: PathBuf,

    /// Output root; manifests land in a namespace subdirectory
    #[arg(short, long)]
    pub output: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let request = DeploymentRequest::from_file(&args.request)
        .with_context(|| format!("reading request {}", args.request.display()))?;
    let spec = request.validate().context("invalid deployment request")?;

    let generator = ManifestGenerator::new(GeneratorConfig::for_templates(&args.templates));
    let manifests = generator
        .generate(&spec, &args.output)
        .context("manifest generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&manifests)?);
    } else {
        println!("Generated manifests in {}:", manifests.output_dir.display());
        println!("{}", manifests.summary);
    }

    info!("Generated {} manifest files", manifests.files.len());
    Ok(())
}
