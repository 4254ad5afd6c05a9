use std::path::PathBuf;

use plugin_lint::artifact::ArtifactKind;
use plugin_lint::finding::{
    ArtifactReport, ArtifactStatus, BatchReport, Category, Finding, Severity,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_finding(rule_id: &str, severity: Severity) -> Finding {
    Finding::new(rule_id, Category::Schema, severity, "message")
        .at(PathBuf::from("commands/run-tests.md"), Some(3))
}

fn report_with(findings: Vec<Finding>, strict: bool) -> ArtifactReport {
    ArtifactReport::from_findings(
        ArtifactKind::Command,
        "run-tests",
        PathBuf::from("commands/run-tests.md"),
        findings,
        strict,
    )
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[test]
fn no_findings_is_valid() {
    let report = report_with(vec![], false);
    assert_eq!(report.status, ArtifactStatus::Valid);
    assert!(report.passed);
}

#[test]
fn recommendations_and_info_stay_valid() {
    let report = report_with(
        vec![
            make_finding("naming/verb-first", Severity::Recommendation),
            make_finding("hooks/wildcard-matcher", Severity::Info),
        ],
        false,
    );
    assert_eq!(report.status, ArtifactStatus::Valid);
}

#[test]
fn warning_yields_warnings_status_and_passes() {
    let report = report_with(
        vec![make_finding("schema/description-too-short", Severity::Warning)],
        false,
    );
    assert_eq!(report.status, ArtifactStatus::Warnings);
    assert!(report.passed);
}

#[test]
fn strict_mode_turns_warnings_into_errors() {
    let report = report_with(
        vec![make_finding("schema/description-too-short", Severity::Warning)],
        true,
    );
    assert_eq!(report.status, ArtifactStatus::Errors);
    assert!(!report.passed);
}

#[test]
fn critical_yields_errors() {
    let report = report_with(
        vec![make_finding("model/short-alias", Severity::Critical)],
        false,
    );
    assert_eq!(report.status, ArtifactStatus::Errors);
    assert!(!report.passed);
}

#[test]
fn parse_error_report_fails_without_findings() {
    let report = ArtifactReport::parse_error(
        ArtifactKind::Agent,
        "broken",
        PathBuf::from("agents/broken.md"),
        "invalid YAML: mapping values are not allowed".to_string(),
    );
    assert_eq!(report.status, ArtifactStatus::ParseError);
    assert!(report.findings.is_empty());
    assert!(!report.passed);
    assert!(report.parse_error.as_deref().unwrap().contains("invalid YAML"));
}

// ---------------------------------------------------------------------------
// Ordering and counting
// ---------------------------------------------------------------------------

#[test]
fn findings_sorted_by_severity_keeping_rule_order() {
    let report = report_with(
        vec![
            make_finding("a/info", Severity::Info),
            make_finding("b/warning", Severity::Warning),
            make_finding("c/critical", Severity::Critical),
            make_finding("d/warning", Severity::Warning),
        ],
        false,
    );
    let ids: Vec<&str> = report.findings.iter().map(|f| f.rule_id.as_str()).collect();
    assert_eq!(ids, ["c/critical", "b/warning", "d/warning", "a/info"]);
}

#[test]
fn count_by_severity_counts_each_level() {
    let report = report_with(
        vec![
            make_finding("a", Severity::Critical),
            make_finding("b", Severity::Warning),
            make_finding("c", Severity::Warning),
            make_finding("d", Severity::Recommendation),
        ],
        false,
    );
    assert_eq!(report.count_by_severity(), (1, 2, 1, 0));
    assert_eq!(report.count(Severity::Warning), 2);
    assert!(report.has_rule("d"));
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

#[test]
fn batch_with_only_warnings_exits_zero() {
    let batch = BatchReport {
        kind: ArtifactKind::Command,
        reports: vec![
            report_with(vec![], false),
            report_with(vec![make_finding("w", Severity::Warning)], false),
        ],
    };
    assert!(batch.passed());
    assert_eq!(batch.exit_code(), 0);
    assert_eq!(batch.count(ArtifactStatus::Warnings), 1);
}

#[test]
fn batch_with_parse_error_exits_one() {
    let batch = BatchReport {
        kind: ArtifactKind::Agent,
        reports: vec![
            report_with(vec![], false),
            ArtifactReport::parse_error(
                ArtifactKind::Agent,
                "broken",
                PathBuf::from("agents/broken.md"),
                "missing YAML frontmatter".to_string(),
            ),
        ],
    };
    assert!(!batch.passed());
    assert_eq!(batch.exit_code(), 1);
}

#[test]
fn severity_serializes_lowercase() {
    let json = serde_json::to_string(&Severity::Recommendation).unwrap();
    assert_eq!(json, "\"recommendation\"");
    let json = serde_json::to_string(&Category::HookSchema).unwrap();
    assert_eq!(json, "\"hook-schema\"");
}
