//! Violation accumulation and the validation report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Severity of a single policy violation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fails the run.
    Error,
    /// Reported to the operator log only.
    Warning,
}

/// One policy rule failure against one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Resource kind the rule applied to.
    pub kind: String,
    /// Resource name from the document metadata.
    pub resource: String,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    pub fn error(
        kind: impl Into<String>,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            resource: resource.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        kind: impl Into<String>,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            resource: resource.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// One-line rendering: `Kind name: message`.
    pub fn describe(&self) -> String {
        format!("{} {}: {}", self.kind, self.resource, self.message)
    }
}

/// Accumulates violations across the whole validation pass. Never
/// aborts on a violation; the verdict is computed once at the end.
#[derive(Debug)]
pub struct ReportBuilder {
    violations: Vec<Violation>,
    started_at: DateTime<Utc>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn error(
        &mut self,
        kind: impl Into<String>,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Violation::error(kind, resource, message));
    }

    pub fn warning(
        &mut self,
        kind: impl Into<String>,
        resource: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Violation::warning(kind, resource, message));
    }

    /// Finalize into an immutable report.
    pub fn finish(self) -> ValidationReport {
        let valid = !self
            .violations
            .iter()
            .any(|v| v.severity == Severity::Error);
        ValidationReport {
            valid,
            violations: self.violations,
            started_at: self.started_at,
            completed_at: Utc::now(),
        }
    }
}

/// Outcome of one validation pass over a manifest directory.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// True iff no error-severity violation was recorded.
    pub valid: bool,
    /// All violations, in the order they were found.
    pub violations: Vec<Violation>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    /// All violation messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::describe).collect()
    }

    /// Turn an invalid report into the aggregate failure, carrying the
    /// full newline-joined error list.
    pub fn ensure_valid(&self) -> Result<(), PolicyError> {
        if self.valid {
            return Ok(());
        }
        let details = self
            .errors()
            .map(Violation::describe)
            .collect::<Vec<_>>()
            .join("\n");
        Err(PolicyError::ValidationFailed {
            count: self.errors().count(),
            details,
        })
    }

    /// Generate a human-readable report.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Status: {}\n",
            if self.valid { "PASSED" } else { "FAILED" }
        ));

        let errors: Vec<_> = self.errors().collect();
        if !errors.is_empty() {
            out.push_str(&format!("\nErrors ({}):\n", errors.len()));
            for violation in errors {
                out.push_str(&format!("  - {}\n", violation.describe()));
            }
        }

        let warnings: Vec<_> = self.warnings().collect();
        if !warnings.is_empty() {
            out.push_str(&format!("\nWarnings ({}):\n", warnings.len()));
            for violation in warnings {
                out.push_str(&format!("  - {}\n", violation.describe()));
            }
        }

        out
    }
}
