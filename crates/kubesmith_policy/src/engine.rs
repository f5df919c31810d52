//! Policy validation engine.
//!
//! Dispatches kind-specific checks over parsed manifest documents and
//! accumulates every violation before rendering a verdict. No check
//! aborts the pass; one document's problems never hide another's.

use std::path::Path;

use regex::Regex;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::error::PolicyResult;
use crate::parser::{ManifestDocument, ManifestParser};
use crate::report::{ReportBuilder, ValidationReport};
use crate::rules::{NamingPolicy, StoragePolicy};

/// Policy validation engine.
pub struct PolicyEngine {
    naming: NamingPolicy,
    storage: StoragePolicy,
    size_pattern: Regex,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyEngine {
    /// Create an engine with the default policies.
    pub fn new() -> Self {
        Self::with_policies(NamingPolicy::default(), StoragePolicy::default())
    }

    /// Create an engine with explicit policies.
    pub fn with_policies(naming: NamingPolicy, storage: StoragePolicy) -> Self {
        Self {
            naming,
            storage,
            // Match <integer><unit> sizes like 10Gi
            size_pattern: Regex::new(r"^(\d+)(Gi|Mi|Ti)$").unwrap(),
        }
    }

    /// Validate every manifest in a directory and return the full
    /// report. Warnings are logged; the verdict is driven by errors
    /// only.
    pub fn validate_dir(&self, dir: &Path) -> PolicyResult<ValidationReport> {
        info!("Validating manifests in: {}", dir.display());

        let mut builder = ReportBuilder::new();
        let documents = ManifestParser::parse_dir(dir, &mut builder)?;

        for document in &documents {
            self.check_document(document, &mut builder);
        }

        let report = builder.finish();
        for warning in report.warnings() {
            warn!("{}", warning.describe());
        }
        info!(
            "Validation complete: {} ({} violations)",
            if report.valid { "PASSED" } else { "FAILED" },
            report.violations.len()
        );

        Ok(report)
    }

    /// Run the checks that apply to one document's kind.
    pub fn check_document(&self, document: &ManifestDocument, report: &mut ReportBuilder) {
        debug!("Validating {}: {}", document.kind, document.name);
        match document.kind.as_str() {
            "Ingress" => self.check_ingress(document, report),
            "PersistentVolumeClaim" => self.check_pvc(document, report),
            "PersistentVolume" => self.check_pv(document, report),
            "Deployment" => self.check_deployment(document, report),
            _ => {}
        }
    }

    /// DNS naming rules for ingress hosts. The three host rules are
    /// independent; a single host can violate more than one.
    fn check_ingress(&self, document: &ManifestDocument, report: &mut ReportBuilder) {
        // An empty or null annotation value counts as no annotation.
        let has_external_dns = document
            .body
            .get("metadata")
            .and_then(|m| m.get("annotations"))
            .and_then(|a| a.get(self.naming.external_dns_annotation.as_str()))
            .is_some_and(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.is_empty(),
                Value::Bool(b) => *b,
                _ => true,
            });

        let rules = document
            .body
            .get("spec")
            .and_then(|s| s.get("rules"))
            .and_then(Value::as_sequence);
        let Some(rules) = rules else { return };

        for rule in rules {
            let host = rule.get("host").and_then(Value::as_str).unwrap_or("");
            if host.is_empty() {
                report.error(&document.kind, &document.name, "Missing host");
                continue;
            }

            if has_external_dns && host.contains(self.naming.internal_marker.as_str()) {
                report.error(
                    &document.kind,
                    &document.name,
                    format!(
                        "External apps cannot use the internal domain: host \"{}\"",
                        host
                    ),
                );
            }

            if !has_external_dns && !host.ends_with(self.naming.internal_zone_suffix.as_str()) {
                report.error(
                    &document.kind,
                    &document.name,
                    format!(
                        "Internal apps must use the {} domain: host \"{}\"",
                        self.naming.internal_zone_suffix, host
                    ),
                );
            }

            if host.ends_with(self.naming.public_zone_suffix.as_str())
                && !host.contains(self.naming.internal_marker.as_str())
                && !has_external_dns
            {
                report.error(
                    &document.kind,
                    &document.name,
                    format!(
                        "Public domain \"{}\" requires the {} annotation",
                        host, self.naming.external_dns_annotation
                    ),
                );
            }
        }
    }

    /// Storage-class and size rules for claims. A size failing the
    /// format check produces only the format error; the range check
    /// runs only on well-formed sizes.
    fn check_pvc(&self, document: &ManifestDocument, report: &mut ReportBuilder) {
        let spec = document.body.get("spec");

        let storage_class = spec
            .and_then(|s| s.get("storageClassName"))
            .and_then(Value::as_str);
        if storage_class.is_none_or(str::is_empty) {
            report.error(&document.kind, &document.name, "Missing storageClassName");
        }

        let size = spec
            .and_then(|s| s.get("resources"))
            .and_then(|r| r.get("requests"))
            .and_then(|r| r.get("storage"));
        let Some(size) = size else { return };
        let size = match size {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };

        match self.size_pattern.captures(&size) {
            None => {
                report.error(
                    &document.kind,
                    &document.name,
                    format!("Invalid storage size format \"{}\"", size),
                );
            }
            Some(caps) => {
                if &caps[2] == "Gi" {
                    let in_range = caps[1]
                        .parse::<u64>()
                        .map(|n| (self.storage.min_gi..=self.storage.max_gi).contains(&n))
                        .unwrap_or(false);
                    if !in_range {
                        report.error(
                            &document.kind,
                            &document.name,
                            format!(
                                "Storage size {} out of range ({}-{})",
                                size, self.storage.min_gi, self.storage.max_gi
                            ),
                        );
                    }
                }
            }
        }
    }

    /// NFS path hygiene for persistent volumes. Both path rules are
    /// evaluated independently.
    fn check_pv(&self, document: &ManifestDocument, report: &mut ReportBuilder) {
        let nfs = document.body.get("spec").and_then(|s| s.get("nfs"));
        let Some(nfs) = nfs.filter(|v| !v.is_null()) else {
            return;
        };

        let path = nfs.get("path").and_then(Value::as_str).unwrap_or("");

        if path.contains("..") {
            report.error(
                &document.kind,
                &document.name,
                format!("NFS path \"{}\" contains relative references (..)", path),
            );
        }

        if !path.starts_with('/') {
            report.error(
                &document.kind,
                &document.name,
                format!("NFS path \"{}\" must start with /", path),
            );
        }
    }

    /// Security-context advisories for workloads. These never fail the
    /// run.
    fn check_deployment(&self, document: &ManifestDocument, report: &mut ReportBuilder) {
        let pod_spec = document
            .body
            .get("spec")
            .and_then(|s| s.get("template"))
            .and_then(|t| t.get("spec"));

        let run_as_non_root = pod_spec
            .and_then(|s| s.get("securityContext"))
            .and_then(|c| c.get("runAsNonRoot"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let containers = pod_spec
            .and_then(|s| s.get("containers"))
            .and_then(Value::as_sequence);

        for container in containers.into_iter().flatten() {
            if !run_as_non_root {
                report.warning(
                    &document.kind,
                    &document.name,
                    "Consider setting runAsNonRoot=true for security",
                );
            }

            let escalation_disabled = container
                .get("securityContext")
                .and_then(|c| c.get("allowPrivilegeEscalation"))
                .and_then(Value::as_bool)
                == Some(false);
            if !escalation_disabled {
                report.warning(
                    &document.kind,
                    &document.name,
                    "Consider setting allowPrivilegeEscalation=false",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(yaml: &str) -> ManifestDocument {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let kind = value.get("kind").unwrap().as_str().unwrap().to_string();
        let name = value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        ManifestDocument {
            kind,
            name,
            body: value,
        }
    }

    fn check(yaml: &str) -> ValidationReport {
        let engine = PolicyEngine::new();
        let mut builder = ReportBuilder::new();
        engine.check_document(&document(yaml), &mut builder);
        builder.finish()
    }

    #[test]
    fn test_internal_host_valid() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n  name: blog\n\
             spec:\n  rules:\n    - host: blog.in.hypyr.space\n",
        );
        assert!(report.valid, "violations: {:?}", report.messages());
    }

    #[test]
    fn test_missing_host() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n  name: blog\n\
             spec:\n  rules:\n    - http: {}\n",
        );
        assert_eq!(report.errors().count(), 1);
        assert!(report.messages()[0].contains("Missing host"));
    }

    #[test]
    fn test_public_host_without_annotation_two_errors() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n  name: blog\n\
             spec:\n  rules:\n    - host: blog.hypyr.space\n",
        );
        let messages = report.messages();
        assert_eq!(report.errors().count(), 2, "messages: {:?}", messages);
        assert!(messages.iter().any(|m| m.contains("must use the .in.hypyr.space domain")));
        assert!(messages.iter().any(|m| m.contains("requires the external-dns")));
    }

    #[test]
    fn test_external_host_with_annotation_valid() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n\
             \x20 name: blog\n\
             \x20 annotations:\n\
             \x20   external-dns.alpha.kubernetes.io/hostname: blog.hypyr.space\n\
             spec:\n  rules:\n    - host: blog.hypyr.space\n",
        );
        assert!(report.valid, "violations: {:?}", report.messages());
    }

    #[test]
    fn test_external_annotation_on_internal_host() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n\
             \x20 name: blog\n\
             \x20 annotations:\n\
             \x20   external-dns.alpha.kubernetes.io/hostname: blog.in.hypyr.space\n\
             spec:\n  rules:\n    - host: blog.in.hypyr.space\n",
        );
        assert_eq!(report.errors().count(), 1);
        assert!(report.messages()[0].contains("cannot use the internal domain"));
    }

    #[test]
    fn test_empty_annotation_value_treated_as_absent() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n\
             \x20 name: blog\n\
             \x20 annotations:\n\
             \x20   external-dns.alpha.kubernetes.io/hostname: \"\"\n\
             spec:\n  rules:\n    - host: blog.hypyr.space\n",
        );
        // Behaves exactly like an unannotated public host
        assert_eq!(report.errors().count(), 2, "messages: {:?}", report.messages());
        assert!(report
            .messages()
            .iter()
            .any(|m| m.contains("requires the external-dns")));
    }

    #[test]
    fn test_foreign_host_without_annotation() {
        let report = check(
            "kind: Ingress\n\
             metadata:\n  name: blog\n\
             spec:\n  rules:\n    - host: blog.example.com\n",
        );
        // Internal-suffix rule fires; the public-zone rule does not.
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_pvc_valid() {
        let report = check(
            "kind: PersistentVolumeClaim\n\
             metadata:\n  name: blog-data\n\
             spec:\n\
             \x20 storageClassName: longhorn\n\
             \x20 resources:\n    requests:\n      storage: 10Gi\n",
        );
        assert!(report.valid);
    }

    #[test]
    fn test_pvc_missing_storage_class() {
        let report = check(
            "kind: PersistentVolumeClaim\n\
             metadata:\n  name: blog-data\n\
             spec:\n\
             \x20 resources:\n    requests:\n      storage: 10Gi\n",
        );
        assert_eq!(report.errors().count(), 1);
        assert!(report.messages()[0].contains("Missing storageClassName"));
    }

    #[test]
    fn test_pvc_size_out_of_range() {
        let report = check(
            "kind: PersistentVolumeClaim\n\
             metadata:\n  name: blog-data\n\
             spec:\n\
             \x20 storageClassName: longhorn\n\
             \x20 resources:\n    requests:\n      storage: 2000Gi\n",
        );
        assert_eq!(report.errors().count(), 1);
        assert!(report.messages()[0].contains("out of range"));
    }

    #[test]
    fn test_pvc_invalid_format_short_circuits_range() {
        let report = check(
            "kind: PersistentVolumeClaim\n\
             metadata:\n  name: blog-data\n\
             spec:\n\
             \x20 storageClassName: longhorn\n\
             \x20 resources:\n    requests:\n      storage: 5Gb\n",
        );
        // Exactly one error; the range check is not evaluated for a
        // malformed size.
        assert_eq!(report.errors().count(), 1);
        assert!(report.messages()[0].contains("Invalid storage size format"));
    }

    #[test]
    fn test_pvc_mi_and_ti_not_range_checked() {
        for size in ["512Mi", "2Ti"] {
            let report = check(&format!(
                "kind: PersistentVolumeClaim\n\
                 metadata:\n  name: blog-data\n\
                 spec:\n\
                 \x20 storageClassName: longhorn\n\
                 \x20 resources:\n    requests:\n      storage: {}\n",
                size
            ));
            assert!(report.valid, "{} should be accepted", size);
        }
    }

    #[test]
    fn test_pv_traversal_path_two_errors() {
        let report = check(
            "kind: PersistentVolume\n\
             metadata:\n  name: blog-nfs\n\
             spec:\n  nfs:\n    path: ../etc\n",
        );
        let messages = report.messages();
        assert_eq!(report.errors().count(), 2, "messages: {:?}", messages);
        assert!(messages.iter().any(|m| m.contains("relative references")));
        assert!(messages.iter().any(|m| m.contains("must start with /")));
    }

    #[test]
    fn test_pv_absolute_path_valid() {
        let report = check(
            "kind: PersistentVolume\n\
             metadata:\n  name: blog-nfs\n\
             spec:\n  nfs:\n    path: /volumes/blog\n",
        );
        assert!(report.valid);
    }

    #[test]
    fn test_pv_without_nfs_ignored() {
        let report = check(
            "kind: PersistentVolume\n\
             metadata:\n  name: blog-local\n\
             spec:\n  hostPath:\n    path: whatever\n",
        );
        assert!(report.valid);
    }

    #[test]
    fn test_deployment_warnings_only() {
        let report = check(
            "kind: Deployment\n\
             metadata:\n  name: blog\n\
             spec:\n\
             \x20 template:\n\
             \x20   spec:\n\
             \x20     containers:\n\
             \x20       - name: blog\n\
             \x20         image: blog:v1\n",
        );
        assert!(report.valid);
        assert_eq!(report.warnings().count(), 2);
    }

    #[test]
    fn test_deployment_hardened_no_warnings() {
        let report = check(
            "kind: Deployment\n\
             metadata:\n  name: blog\n\
             spec:\n\
             \x20 template:\n\
             \x20   spec:\n\
             \x20     securityContext:\n\
             \x20       runAsNonRoot: true\n\
             \x20     containers:\n\
             \x20       - name: blog\n\
             \x20         securityContext:\n\
             \x20           allowPrivilegeEscalation: false\n",
        );
        assert!(report.valid);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_unknown_kind_ignored() {
        let report = check("kind: ConfigMap\nmetadata:\n  name: blog\ndata: {}\n");
        assert!(report.valid);
        assert!(report.violations.is_empty());
    }
}
