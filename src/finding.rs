use std::fmt;
use std::path::PathBuf;

use crate::artifact::ArtifactKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Recommendation,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Recommendation => "recommendation",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule category. Each category is scored independently by [`crate::score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Naming,
    Schema,
    Model,
    Tools,
    Arguments,
    Security,
    HookSchema,
    Filesystem,
    Content,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Naming => "Naming",
            Category::Schema => "Schema Compliance",
            Category::Model => "Model Configuration",
            Category::Tools => "Tool Permissions",
            Category::Arguments => "Argument Handling",
            Category::Security => "Security",
            Category::HookSchema => "Hook Schema",
            Category::Filesystem => "Filesystem",
            Category::Content => "Content Quality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub snippet: Option<String>,
    pub remediation: Option<String>,
}

impl Finding {
    pub fn new(rule_id: &str, category: Category, severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            rule_id: rule_id.to_string(),
            message: message.into(),
            severity,
            category,
            file: None,
            line: None,
            snippet: None,
            remediation: None,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: Option<usize>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// Outcome of validating one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Valid,
    Warnings,
    Errors,
    ParseError,
}

impl ArtifactStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, ArtifactStatus::Errors | ArtifactStatus::ParseError)
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub identity: String,
    pub location: PathBuf,
    pub audit_timestamp: String,
    pub status: ArtifactStatus,
    pub findings: Vec<Finding>,
    /// Decoder or I/O message when `status` is `parse_error`.
    pub parse_error: Option<String>,
    pub passed: bool,
}

impl ArtifactReport {
    pub fn from_findings(
        kind: ArtifactKind,
        identity: &str,
        location: PathBuf,
        mut findings: Vec<Finding>,
        strict: bool,
    ) -> Self {
        // Stable: rules keep their battery order within a severity.
        findings.sort_by_key(|f| f.severity);
        let status = compute_status(&findings, strict);
        ArtifactReport {
            kind,
            identity: identity.to_string(),
            location,
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            passed: !status.is_failure(),
            findings,
            parse_error: None,
        }
    }

    pub fn parse_error(kind: ArtifactKind, identity: &str, location: PathBuf, message: String) -> Self {
        ArtifactReport {
            kind,
            identity: identity.to_string(),
            location,
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status: ArtifactStatus::ParseError,
            findings: Vec::new(),
            parse_error: Some(message),
            passed: false,
        }
    }

    /// Report for an artifact whose validation aborted unexpectedly.
    pub fn internal_error(kind: ArtifactKind, identity: &str, location: PathBuf, message: String) -> Self {
        let finding = Finding::new(
            "audit/internal-error",
            Category::Content,
            Severity::Critical,
            format!("Validation aborted: {message}"),
        )
        .at(location.clone(), None);
        ArtifactReport {
            kind,
            identity: identity.to_string(),
            location,
            audit_timestamp: chrono::Utc::now().to_rfc3339(),
            status: ArtifactStatus::Errors,
            findings: vec![finding],
            parse_error: None,
            passed: false,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    /// Count findings per severity in a single pass.
    ///
    /// Returns `(critical, warnings, recommendations, info)`.
    pub fn count_by_severity(&self) -> (usize, usize, usize, usize) {
        self.findings
            .iter()
            .fold((0, 0, 0, 0), |(c, w, r, i), f| match f.severity {
                Severity::Critical => (c + 1, w, r, i),
                Severity::Warning => (c, w + 1, r, i),
                Severity::Recommendation => (c, w, r + 1, i),
                Severity::Info => (c, w, r, i + 1),
            })
    }

    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.findings.iter().any(|f| f.rule_id == rule_id)
    }
}

/// Aggregate of a bulk audit.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchReport {
    pub kind: ArtifactKind,
    pub reports: Vec<ArtifactReport>,
}

impl BatchReport {
    pub fn count(&self, status: ArtifactStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| !r.status.is_failure())
    }

    /// 0 for clean or warnings-only batches, 1 when anything failed.
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

fn compute_status(findings: &[Finding], strict: bool) -> ArtifactStatus {
    let (has_critical, has_warnings) =
        findings
            .iter()
            .fold((false, false), |(c, w), f| match f.severity {
                Severity::Critical => (true, w),
                Severity::Warning => (c, true),
                Severity::Recommendation | Severity::Info => (c, w),
            });

    if has_critical || (has_warnings && strict) {
        ArtifactStatus::Errors
    } else if has_warnings {
        ArtifactStatus::Warnings
    } else {
        ArtifactStatus::Valid
    }
}
