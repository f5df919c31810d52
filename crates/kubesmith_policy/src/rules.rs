//! Policy configuration.
//!
//! The naming and storage constants are deployment-wide policy, fixed
//! at startup. They are deliberately not overridable from request
//! input.

use serde::{Deserialize, Serialize};

/// DNS naming policy for ingress hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Suffix every internal host must carry.
    pub internal_zone_suffix: String,
    /// Suffix of the externally routable zone.
    pub public_zone_suffix: String,
    /// Segment that marks a host as belonging to the internal zone.
    pub internal_marker: String,
    /// Annotation key that registers a host with external DNS.
    pub external_dns_annotation: String,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            internal_zone_suffix: ".in.hypyr.space".to_string(),
            public_zone_suffix: ".hypyr.space".to_string(),
            internal_marker: ".in.".to_string(),
            external_dns_annotation: "external-dns.alpha.kubernetes.io/hostname".to_string(),
        }
    }
}

/// Storage sizing policy for persistent volume claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePolicy {
    /// Inclusive Gi range for requested sizes.
    pub min_gi: u64,
    pub max_gi: u64,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            min_gi: 1,
            max_gi: 1000,
        }
    }
}
