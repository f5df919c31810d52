//! Integration tests for the policy validation engine.

use std::fs;
use std::path::Path;

use kubesmith_policy::{PolicyEngine, PolicyError, Severity};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_clean_bundle_passes() {
    let temp = tempdir().unwrap();
    write(
        temp.path(),
        "ingress.yaml",
        "kind: Ingress\n\
         metadata:\n  name: blog\n\
         spec:\n  rules:\n    - host: blog.in.hypyr.space\n",
    );
    write(
        temp.path(),
        "pvc-longhorn.yaml",
        "kind: PersistentVolumeClaim\n\
         metadata:\n  name: blog-data\n\
         spec:\n\
         \x20 storageClassName: longhorn\n\
         \x20 resources:\n    requests:\n      storage: 10Gi\n",
    );
    write(temp.path(), "kustomization.yaml", "kind: Kustomization\nresources: []\n");

    let report = PolicyEngine::new().validate_dir(temp.path()).unwrap();
    assert!(report.valid, "violations: {:?}", report.messages());
    assert!(report.ensure_valid().is_ok());
}

#[test]
fn test_all_violations_accumulated_across_documents() {
    let temp = tempdir().unwrap();
    // Two errors from the ingress host
    write(
        temp.path(),
        "ingress.yaml",
        "kind: Ingress\n\
         metadata:\n  name: blog\n\
         spec:\n  rules:\n    - host: blog.hypyr.space\n",
    );
    // One error from the claim size
    write(
        temp.path(),
        "pvc.yaml",
        "kind: PersistentVolumeClaim\n\
         metadata:\n  name: blog-data\n\
         spec:\n\
         \x20 storageClassName: longhorn\n\
         \x20 resources:\n    requests:\n      storage: 2000Gi\n",
    );
    // Two errors from the NFS path
    write(
        temp.path(),
        "pv.yaml",
        "kind: PersistentVolume\n\
         metadata:\n  name: blog-nfs\n\
         spec:\n  nfs:\n    path: ../etc\n",
    );

    let report = PolicyEngine::new().validate_dir(temp.path()).unwrap();

    assert!(!report.valid);
    assert_eq!(report.errors().count(), 5);

    // The aggregate failure carries every error, newline-joined
    let err = report.ensure_valid().unwrap_err();
    match err {
        PolicyError::ValidationFailed { count, details } => {
            assert_eq!(count, 5);
            assert_eq!(details.lines().count(), 5);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_multi_document_file_checked_per_document() {
    let temp = tempdir().unwrap();
    write(
        temp.path(),
        "bundle.yaml",
        "kind: Ingress\n\
         metadata:\n  name: a\n\
         spec:\n  rules:\n    - host: a.hypyr.space\n\
         ---\n\
         kind: Ingress\n\
         metadata:\n  name: b\n\
         spec:\n  rules:\n    - host: b.in.hypyr.space\n",
    );

    let report = PolicyEngine::new().validate_dir(temp.path()).unwrap();
    // Document a: internal-suffix + public-domain errors; document b: clean
    assert_eq!(report.errors().count(), 2);
    assert!(report.messages().iter().all(|m| m.contains("Ingress a")));
}

#[test]
fn test_malformed_file_does_not_abort_scan() {
    let temp = tempdir().unwrap();
    write(temp.path(), "broken.yaml", "kind: {unclosed\n");
    write(
        temp.path(),
        "ingress.yaml",
        "kind: Ingress\n\
         metadata:\n  name: blog\n\
         spec:\n  rules:\n    - host: blog.hypyr.space\n",
    );

    let report = PolicyEngine::new().validate_dir(temp.path()).unwrap();

    // One ParseFailure plus the two ingress errors from the healthy file
    assert_eq!(report.errors().count(), 3);
    assert!(report
        .messages()
        .iter()
        .any(|m| m.contains("ParseFailure broken.yaml")));
}

#[test]
fn test_deployment_warnings_reported_but_valid() {
    let temp = tempdir().unwrap();
    write(
        temp.path(),
        "deployment.yaml",
        "kind: Deployment\n\
         metadata:\n  name: blog\n\
         spec:\n\
         \x20 template:\n\
         \x20   spec:\n\
         \x20     containers:\n\
         \x20       - name: blog\n\
         \x20         image: blog:v1\n",
    );

    let report = PolicyEngine::new().validate_dir(temp.path()).unwrap();
    assert!(report.valid);
    assert_eq!(report.warnings().count(), 2);
    assert!(report
        .violations
        .iter()
        .all(|v| v.severity == Severity::Warning));

    let rendered = report.render();
    assert!(rendered.contains("PASSED"));
    assert!(rendered.contains("Warnings (2)"));
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("does-not-exist");
    let result = PolicyEngine::new().validate_dir(&missing);
    assert!(matches!(result, Err(PolicyError::Io(_))));
}
