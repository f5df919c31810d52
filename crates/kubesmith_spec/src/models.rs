//! Data models for deployment requests.

use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Default backup retention in days.
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

/// Default storage size in Gi when the request leaves it unset.
pub const DEFAULT_STORAGE_SIZE: &str = "10";

/// Kubernetes DNS label pattern for app names.
const APP_NAME_PATTERN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// How the application stores its data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StoragePattern {
    /// No volume at all, pod-local scratch only.
    Ephemeral,
    /// Replicated block volume provisioned in-cluster.
    BlockPersistent,
    /// Volume backed by an NFS export on the NAS.
    NetworkMount,
    /// No volume; the app talks to an S3-compatible object store.
    ObjectStore,
}

impl StoragePattern {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ephemeral" => Some(Self::Ephemeral),
            "block-persistent" => Some(Self::BlockPersistent),
            "network-mount" => Some(Self::NetworkMount),
            "object-store" => Some(Self::ObjectStore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ephemeral => "ephemeral",
            Self::BlockPersistent => "block-persistent",
            Self::NetworkMount => "network-mount",
            Self::ObjectStore => "object-store",
        }
    }

    /// Whether this pattern carries any storage beyond pod-local scratch.
    pub fn has_volume(&self) -> bool {
        !matches!(self, Self::Ephemeral)
    }
}

impl fmt::Display for StoragePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the application is exposed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IngressPattern {
    /// Reachable only on the internal zone.
    InternalOnly,
    /// Published to the public zone through the tunnel.
    ExternalViaTunnel,
}

impl IngressPattern {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "internal-only" => Some(Self::InternalOnly),
            "external-via-tunnel" => Some(Self::ExternalViaTunnel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InternalOnly => "internal-only",
            Self::ExternalViaTunnel => "external-via-tunnel",
        }
    }
}

/// How the application's data is backed up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackupStrategy {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "snapshot-based")]
    SnapshotBased,
}

impl BackupStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "snapshot-based" => Some(Self::SnapshotBased),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SnapshotBased => "snapshot-based",
        }
    }
}

/// Raw deployment request as submitted by the operator.
///
/// Everything is optional here; [`DeploymentRequest::validate`] decides
/// what is actually required and produces the typed [`DeploymentSpec`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub app_name: Option<String>,
    pub container_image: Option<String>,
    pub namespace: Option<String>,
    pub storage_pattern: Option<String>,
    pub storage_size: Option<String>,
    pub nas_endpoint: Option<String>,
    pub nas_subpath: Option<String>,
    pub s3_bucket: Option<String>,
    pub ingress_pattern: Option<String>,
    pub backup_strategy: Option<String>,
    pub retention_days: Option<u32>,
    pub operator_id: Option<String>,
}

impl DeploymentRequest {
    /// Read a request from a YAML file.
    pub fn from_file(path: &Path) -> SpecResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Validate the request and produce an immutable spec with defaults applied.
    pub fn validate(self) -> SpecResult<DeploymentSpec> {
        let app_name = required(self.app_name, "app_name")?;

        let name_pattern = Regex::new(APP_NAME_PATTERN).expect("app name pattern is valid");
        if !name_pattern.is_match(&app_name) {
            return Err(SpecError::InvalidAppName(app_name));
        }

        let container_image = required(self.container_image, "container_image")?;
        let operator_id = required(self.operator_id, "operator_id")?;

        let storage = parse_enum(self.storage_pattern, "storage_pattern", StoragePattern::parse)?;
        let ingress = parse_enum(self.ingress_pattern, "ingress_pattern", IngressPattern::parse)?;
        let backup = parse_enum(self.backup_strategy, "backup_strategy", BackupStrategy::parse)?;

        let namespace = match self.namespace {
            Some(ns) if !ns.is_empty() => ns,
            _ => app_name.clone(),
        };

        Ok(DeploymentSpec {
            app_name,
            container_image,
            namespace,
            storage,
            storage_size: self
                .storage_size
                .unwrap_or_else(|| DEFAULT_STORAGE_SIZE.to_string()),
            nas_endpoint: self.nas_endpoint,
            nas_subpath: self.nas_subpath,
            s3_bucket: self.s3_bucket,
            ingress,
            backup,
            retention_days: self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
            operator_id,
        })
    }
}

fn required(value: Option<String>, field: &str) -> SpecResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SpecError::MissingField(field.to_string())),
    }
}

fn parse_enum<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> SpecResult<T> {
    let raw = required(value, field)?;
    parse(&raw).ok_or_else(|| SpecError::UnknownValue {
        field: field.to_string(),
        value: raw,
    })
}

/// Validated deployment spec. Immutable after validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentSpec {
    pub app_name: String,
    pub container_image: String,
    pub namespace: String,
    pub storage: StoragePattern,
    pub storage_size: String,
    pub nas_endpoint: Option<String>,
    pub nas_subpath: Option<String>,
    pub s3_bucket: Option<String>,
    pub ingress: IngressPattern,
    pub backup: BackupStrategy,
    pub retention_days: u32,
    pub operator_id: String,
}
