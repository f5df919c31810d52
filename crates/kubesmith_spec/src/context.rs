//! Template context derivation.
//!
//! The context is the flat set of fields substituted into the manifest
//! templates. It is derived purely from a validated [`DeploymentSpec`]
//! plus startup defaults; the same spec always yields the same context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{BackupStrategy, DeploymentSpec, IngressPattern, StoragePattern};

/// Startup-injected defaults that are not derived from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDefaults {
    /// Region handed to object-store templates. Known limitation: the
    /// request cannot override this.
    pub s3_region: String,
}

impl Default for ContextDefaults {
    fn default() -> Self {
        Self {
            s3_region: "us-east-1".to_string(),
        }
    }
}

/// Flat field set fed into template rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateContext {
    pub app_name: String,
    pub container_image: String,
    pub namespace: String,
    pub operator_id: String,

    // Storage flags; exactly one of the four pattern booleans is set.
    pub has_volume: bool,
    pub ephemeral_storage: bool,
    pub block_storage: bool,
    pub nfs_storage: bool,
    pub s3_enabled: bool,

    // Storage config
    pub storage_size: String,
    pub nas_server: Option<String>,
    pub nas_subpath: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: String,

    // Ingress flags
    pub external_ingress: bool,

    // Backup flags
    pub volsync_backup: bool,
    pub retention_days: u32,
}

impl TemplateContext {
    /// Derive the context for a validated spec.
    pub fn build(spec: &DeploymentSpec, defaults: &ContextDefaults) -> Self {
        Self {
            app_name: spec.app_name.clone(),
            container_image: spec.container_image.clone(),
            namespace: spec.namespace.clone(),
            operator_id: spec.operator_id.clone(),

            has_volume: spec.storage.has_volume(),
            ephemeral_storage: spec.storage == StoragePattern::Ephemeral,
            block_storage: spec.storage == StoragePattern::BlockPersistent,
            nfs_storage: spec.storage == StoragePattern::NetworkMount,
            s3_enabled: spec.storage == StoragePattern::ObjectStore,

            storage_size: spec.storage_size.clone(),
            nas_server: spec.nas_endpoint.as_deref().map(strip_endpoint),
            nas_subpath: spec.nas_subpath.clone(),
            s3_bucket: spec.s3_bucket.clone(),
            s3_region: defaults.s3_region.clone(),

            external_ingress: spec.ingress == IngressPattern::ExternalViaTunnel,

            volsync_backup: spec.backup == BackupStrategy::SnapshotBased,
            retention_days: spec.retention_days,
        }
    }

    /// Flatten into renderer variables. Ordered map so the variable set
    /// is stable across runs; absent optionals become empty strings.
    pub fn to_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            vars.insert(key.to_string(), value);
        };

        put("app_name", self.app_name.clone());
        put("container_image", self.container_image.clone());
        put("namespace", self.namespace.clone());
        put("operator_id", self.operator_id.clone());

        put("has_volume", bool_var(self.has_volume));
        put("ephemeral_storage", bool_var(self.ephemeral_storage));
        put("block_storage", bool_var(self.block_storage));
        put("nfs_storage", bool_var(self.nfs_storage));
        put("s3_enabled", bool_var(self.s3_enabled));

        put("storage_size", self.storage_size.clone());
        put("nas_server", self.nas_server.clone().unwrap_or_default());
        put("nas_subpath", self.nas_subpath.clone().unwrap_or_default());
        put("s3_bucket", self.s3_bucket.clone().unwrap_or_default());
        put("s3_region", self.s3_region.clone());

        put("external_ingress", bool_var(self.external_ingress));

        put("volsync_backup", bool_var(self.volsync_backup));
        put("retention_days", self.retention_days.to_string());

        vars
    }
}

fn bool_var(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Reduce a NAS endpoint like `nfs://nas01.lan:2049` to the bare
/// hostname `nas01.lan`.
fn strip_endpoint(endpoint: &str) -> String {
    let host = match endpoint.split_once("://") {
        Some((_, rest)) => rest,
        None => endpoint,
    };
    host.split(':').next().unwrap_or(host).to_string()
}
