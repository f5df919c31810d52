//! Manifest directory parsing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::PolicyResult;
use crate::report::ReportBuilder;

/// One kind-tagged document decoded from a manifest file.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    /// Resource kind, e.g. `Ingress`.
    pub kind: String,
    /// `metadata.name`, or `<unnamed>` when absent.
    pub name: String,
    /// The decoded document tree.
    pub body: Value,
}

impl ManifestDocument {
    fn from_value(value: Value) -> Option<Self> {
        let kind = value.get("kind")?.as_str()?.to_string();
        let name = value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        Some(Self {
            kind,
            name,
            body: value,
        })
    }
}

/// Reads a directory of generated manifests into documents.
pub struct ManifestParser;

impl ManifestParser {
    /// Parse every `*.yaml`/`*.yml` file under `dir` (one level deep).
    ///
    /// Files are multi-document streams; documents without a `kind` are
    /// skipped. A file that fails to read or decode is recorded as a
    /// `ParseFailure` violation and does not stop the scan. Only the
    /// directory listing itself can fail.
    pub fn parse_dir(
        dir: &Path,
        report: &mut ReportBuilder,
    ) -> PolicyResult<Vec<ManifestDocument>> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(std::io::Error::other)?
            .into_iter()
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|e| e.to_str()),
                        Some("yaml") | Some("yml")
                    )
            })
            .collect();
        // Stable document order regardless of directory iteration order
        files.sort();

        let mut documents = Vec::new();
        for path in files {
            Self::parse_file(&path, &mut documents, report);
        }

        Ok(documents)
    }

    fn parse_file(path: &Path, documents: &mut Vec<ManifestDocument>, report: &mut ReportBuilder) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", file_name, e);
                report.error("ParseFailure", &file_name, format!("Failed to read file: {}", e));
                return;
            }
        };

        for deserializer in serde_yaml::Deserializer::from_str(&content) {
            match Value::deserialize(deserializer) {
                Ok(value) => {
                    if let Some(document) = ManifestDocument::from_value(value) {
                        debug!("Parsed {} {} from {}", document.kind, document.name, file_name);
                        documents.push(document);
                    }
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", file_name, e);
                    report.error("ParseFailure", &file_name, format!("Failed to parse: {}", e));
                    // The rest of this stream is unreliable; move on to
                    // the next file.
                    break;
                }
            }
        }
    }
}
