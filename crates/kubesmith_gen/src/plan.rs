//! Artifact bindings and the generation plan.
//!
//! The plan is computed in full before any rendering happens, so the
//! aggregation document can enumerate the final artifact set and is
//! always written last.

use serde::{Deserialize, Serialize};

use kubesmith_spec::{BackupStrategy, DeploymentSpec, StoragePattern};

/// A template file and the output basename it renders to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactBinding {
    pub template: String,
    pub output: String,
}

impl ArtifactBinding {
    pub fn new(template: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            output: output.into(),
        }
    }
}

/// Fixed table binding each eligible template to its output file.
/// Injectable at startup; the defaults match the GitOps app skeleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBindings {
    pub deployment: ArtifactBinding,
    pub service: ArtifactBinding,
    pub ingress: ArtifactBinding,
    pub pvc_block: ArtifactBinding,
    pub pvc_nfs: ArtifactBinding,
    pub backup: ArtifactBinding,
    pub kustomization: ArtifactBinding,
}

impl Default for ArtifactBindings {
    fn default() -> Self {
        Self {
            deployment: ArtifactBinding::new("deployment.yaml.hbs", "deployment.yaml"),
            service: ArtifactBinding::new("service.yaml.hbs", "service.yaml"),
            ingress: ArtifactBinding::new("ingress.yaml.hbs", "ingress.yaml"),
            pvc_block: ArtifactBinding::new("pvc-longhorn.yaml.hbs", "pvc-longhorn.yaml"),
            pvc_nfs: ArtifactBinding::new("pvc-nfs.yaml.hbs", "pvc-nfs.yaml"),
            backup: ArtifactBinding::new("volsync.yaml.hbs", "volsync.yaml"),
            kustomization: ArtifactBinding::new("kustomization.yaml.hbs", "kustomization.yaml"),
        }
    }
}

/// Ordered list of artifacts to render for one deployment spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationPlan {
    pub artifacts: Vec<ArtifactBinding>,
}

impl GenerationPlan {
    /// Compute the full artifact list for a spec.
    ///
    /// Order: base documents, then the storage claim (pattern-specific),
    /// then the backup document, then the aggregation document last.
    pub fn for_spec(spec: &DeploymentSpec, bindings: &ArtifactBindings) -> Self {
        let mut artifacts = vec![
            bindings.deployment.clone(),
            bindings.service.clone(),
            bindings.ingress.clone(),
        ];

        match spec.storage {
            StoragePattern::BlockPersistent => artifacts.push(bindings.pvc_block.clone()),
            StoragePattern::NetworkMount => artifacts.push(bindings.pvc_nfs.clone()),
            StoragePattern::Ephemeral | StoragePattern::ObjectStore => {}
        }

        if spec.backup == BackupStrategy::SnapshotBased {
            artifacts.push(bindings.backup.clone());
        }

        artifacts.push(bindings.kustomization.clone());

        Self { artifacts }
    }

    /// Output basenames in render order.
    pub fn basenames(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.output.as_str()).collect()
    }

    /// Markdown bullet list of the output basenames.
    pub fn summary(&self) -> String {
        self.artifacts
            .iter()
            .map(|a| format!("- {}", a.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
