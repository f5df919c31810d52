//! Manifest generation engine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use kubesmith_spec::{ContextDefaults, DeploymentSpec, TemplateContext};

use crate::error::{GenError, GenResult};
use crate::plan::{ArtifactBindings, GenerationPlan};
use crate::renderer::TemplateRenderer;

/// Generator configuration, injected at startup.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory holding the template files.
    pub templates_dir: PathBuf,
    /// Template name → output basename table.
    pub bindings: ArtifactBindings,
    /// Context defaults not derived from the request.
    pub defaults: ContextDefaults,
}

impl GeneratorConfig {
    /// Create a config for a templates directory with default bindings.
    pub fn for_templates(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            bindings: ArtifactBindings::default(),
            defaults: ContextDefaults::default(),
        }
    }
}

/// The set of manifests generated for one deployment spec.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedManifests {
    /// Deployment-scoped output directory.
    pub output_dir: PathBuf,
    /// Generated files, in render order.
    pub files: Vec<PathBuf>,
    /// Markdown bullet list of generated basenames.
    pub summary: String,
}

/// Renders the eligible templates for a spec and writes the manifests.
pub struct ManifestGenerator {
    config: GeneratorConfig,
    renderer: TemplateRenderer,
}

impl ManifestGenerator {
    /// Create a new generator with configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Generate all manifests for a spec under `output_root/<namespace>/`.
    ///
    /// Deterministic in content: the same spec and templates produce
    /// byte-identical files. A second run overwrites in place. Fatal on
    /// the first missing template or write failure; partial output is
    /// left on disk.
    pub fn generate(
        &self,
        spec: &DeploymentSpec,
        output_root: &Path,
    ) -> GenResult<GeneratedManifests> {
        info!("Generating manifests for app: {}", spec.app_name);

        let context = TemplateContext::build(spec, &self.config.defaults);
        let plan = GenerationPlan::for_spec(spec, &self.config.bindings);

        let output_dir = output_root.join(&spec.namespace);
        fs::create_dir_all(&output_dir).map_err(|source| GenError::WriteFailed {
            path: output_dir.clone(),
            source,
        })?;

        // The aggregation template enumerates the artifact set, so the
        // plan's bullet list is exposed to every template.
        let mut vars = context.to_vars();
        vars.insert("artifact_list".to_string(), plan.summary());

        let mut files = Vec::with_capacity(plan.artifacts.len());
        for artifact in &plan.artifacts {
            let template_path = self.config.templates_dir.join(&artifact.template);
            if !template_path.exists() {
                return Err(GenError::TemplateNotFound(template_path));
            }

            debug!("Rendering template: {}", artifact.template);
            let template = fs::read_to_string(&template_path)?;
            let rendered = self.renderer.render(&template, &vars)?;

            let output_path = output_dir.join(&artifact.output);
            fs::write(&output_path, rendered).map_err(|source| GenError::WriteFailed {
                path: output_path.clone(),
                source,
            })?;

            info!("Generated: {}", artifact.output);
            files.push(output_path);
        }

        info!("Generated {} manifest files", files.len());

        Ok(GeneratedManifests {
            output_dir,
            files,
            summary: plan.summary(),
        })
    }
}
