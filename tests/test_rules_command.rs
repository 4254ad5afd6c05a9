use plugin_lint::artifact::ArtifactKind;
use plugin_lint::audit;
use plugin_lint::config::Config;
use plugin_lint::finding::{ArtifactReport, ArtifactStatus, Severity};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SECTIONS: &str = "\n## Workflow\n\n1. Do the thing\n\n## Examples\n\n/run-tests\n";

fn validate_with(name: &str, content: &str, config: &Config) -> ArtifactReport {
    let dir = tempfile::tempdir().unwrap();
    let commands = dir.path().join("commands");
    std::fs::create_dir_all(&commands).unwrap();
    let path = commands.join(format!("{name}.md"));
    std::fs::write(&path, content).unwrap();
    audit::validate_path(ArtifactKind::Command, &path, config)
}

fn validate(name: &str, content: &str) -> ArtifactReport {
    validate_with(name, content, &Config::default())
}

fn command(frontmatter: &str, body: &str) -> String {
    format!("---\n{frontmatter}---\n# Command\n{body}")
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[test]
fn short_alias_is_the_only_critical() {
    let report = validate(
        "fix-bug",
        &command("description: fix the bug\nmodel: haiku\n", SECTIONS),
    );
    assert_eq!(report.count(Severity::Critical), 1);
    assert!(report.has_rule("model/short-alias"));
    assert!(!report.has_rule("schema/description-too-short"));
    assert_eq!(report.status, ArtifactStatus::Errors);
}

#[test]
fn version_alias_is_accepted() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nmodel: claude-haiku-4-5\n", SECTIONS),
    );
    assert!(!report.has_rule("model/short-alias"));
    assert!(!report.has_rule("model/unrecognized"));
    assert_eq!(report.status, ArtifactStatus::Valid);
}

#[test]
fn inherit_is_a_short_alias_for_commands() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nmodel: inherit\n", SECTIONS),
    );
    assert!(report.has_rule("model/short-alias"));
}

#[test]
fn unknown_model_is_a_warning() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nmodel: gpt-4\n", SECTIONS),
    );
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "model/unrecognized")
        .unwrap();
    assert_eq!(f.severity, Severity::Warning);
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

#[test]
fn uppercase_identity_is_critical() {
    let report = validate("RunTests", &command("description: Run the test suite\n", SECTIONS));
    assert!(report.has_rule("naming/invalid-charset"));
    assert!(report.count(Severity::Critical) >= 1);
}

#[test]
fn underscore_identity_reports_both_rules() {
    let report = validate("run_tests", &command("description: Run the test suite\n", SECTIONS));
    assert!(report.has_rule("naming/invalid-charset"));
    assert!(report.has_rule("naming/underscore"));
}

#[test]
fn long_identity_is_critical() {
    let name = format!("run-{}", "x".repeat(70));
    let report = validate(&name, &command("description: Run the test suite\n", SECTIONS));
    assert!(report.has_rule("naming/too-long"));
}

#[test]
fn non_verb_name_is_a_recommendation() {
    let report = validate("pr-helper", &command("description: Helps with PRs\n", SECTIONS));
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "naming/verb-first")
        .unwrap();
    assert_eq!(f.severity, Severity::Recommendation);
    assert_eq!(report.status, ArtifactStatus::Valid);
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[test]
fn missing_description_is_critical() {
    let report = validate("run-tests", &command("model: claude-haiku-4-5\n", SECTIONS));
    assert!(report.has_rule("schema/missing-description"));
    assert!(!report.has_rule("schema/missing-name"));
}

#[test]
fn short_description_is_a_warning() {
    let report = validate("run-tests", &command("description: Tests\n", SECTIONS));
    assert!(report.has_rule("schema/description-too-short"));
    assert_eq!(report.status, ArtifactStatus::Warnings);
}

#[test]
fn long_description_is_a_warning_for_commands() {
    let fm = format!("description: {}\n", "word ".repeat(60));
    let report = validate("run-tests", &command(&fm, SECTIONS));
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "schema/description-too-long")
        .unwrap();
    assert_eq!(f.severity, Severity::Warning);
}

#[test]
fn non_string_description_is_critical() {
    let report = validate("run-tests", &command("description:\n  - a\n  - b\n", SECTIONS));
    assert!(report.has_rule("schema/description-not-string"));
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[test]
fn placeholder_without_hint() {
    let body = format!("\nProcess $ARGUMENTS now.\n{SECTIONS}");
    let report = validate("run-tests", &command("description: Run the test suite\n", &body));
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "args/missing-hint")
        .unwrap();
    // Frontmatter spans lines 1-3, heading on 4, blank 5, placeholder on 6.
    assert_eq!(f.line, Some(6));
    assert!(report.has_rule("args/undocumented"));
}

#[test]
fn hint_without_placeholder() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nargument-hint: \"[path]\"\n", SECTIONS),
    );
    assert!(report.has_rule("args/unused-hint"));
    assert!(!report.has_rule("args/hint-not-bracketed"));
}

#[test]
fn unbracketed_hint() {
    let body = format!("\nRun on $1.\n\n## Arguments\n\n- path\n{SECTIONS}");
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nargument-hint: path\n", &body),
    );
    assert!(report.has_rule("args/hint-not-bracketed"));
    assert!(!report.has_rule("args/missing-hint"));
    assert!(!report.has_rule("args/undocumented"));
}

#[test]
fn shell_block_arguments_need_validation() {
    let body = format!(
        "\n## Arguments\n\n- path\n\n```bash\nls $1\n```\n\n```bash\nif [ -z \"$1\" ]; then exit 1; fi\ncat $1\n```\n{SECTIONS}"
    );
    let report = validate(
        "show-file",
        &command("description: Show a file's contents\nargument-hint: \"[path]\"\n", &body),
    );
    let hits: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "args/unvalidated-shell-args")
        .collect();
    assert_eq!(hits.len(), 1, "the guarded block is fine");
    assert_eq!(hits[0].severity, Severity::Warning);
    assert_eq!(hits[0].line, Some(12));
    assert_eq!(hits[0].snippet.as_deref(), Some("ls $1"));
}

#[test]
fn prose_placeholders_are_not_shell_arguments() {
    let body = format!("\nRun on $1.\n\n## Arguments\n\n- path\n{SECTIONS}");
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nargument-hint: \"[path]\"\n", &body),
    );
    assert!(!report.has_rule("args/unvalidated-shell-args"));
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

#[test]
fn bash_without_validation_is_critical() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nallowed-tools: Read, Bash\n", SECTIONS),
    );
    assert!(report.has_rule("tools/bash-without-validation"));
}

#[test]
fn bash_with_validation_mentioned_is_fine() {
    let body = format!("\nInput validation: only numeric ids are accepted.\n{SECTIONS}");
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nallowed-tools: Read, Bash(npm test:*)\n", &body),
    );
    assert!(!report.has_rule("tools/bash-without-validation"));
}

#[test]
fn unknown_and_too_many_tools() {
    let report = validate(
        "run-tests",
        &command(
            "description: Run the test suite\nallowed-tools: Read, Grep, Glob, Edit, Write, WebFetch, Teleport\n",
            SECTIONS,
        ),
    );
    assert!(report.has_rule("tools/unknown"));
    assert!(report.has_rule("tools/too-many"));
    assert!(report.has_rule("tools/redundant-write"));
}

#[test]
fn legacy_tools_field_is_deprecated() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\ntools: Read\n", SECTIONS),
    );
    assert!(report.has_rule("tools/deprecated-field"));
}

// ---------------------------------------------------------------------------
// Content and configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_sections_is_one_finding() {
    let report = validate("run-tests", &command("description: Run the test suite\n", ""));
    let missing: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule_id == "content/missing-sections")
        .collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message.contains("Workflow"));
    assert!(missing[0].message.contains("Examples"));
}

#[test]
fn disabled_rule_is_dropped() {
    let mut config = Config::default();
    config.rules.disabled.push("model/short-alias".to_string());
    let report = validate_with(
        "run-tests",
        &command("description: Run the test suite\nmodel: haiku\n", SECTIONS),
        &config,
    );
    assert!(!report.has_rule("model/short-alias"));
    assert_eq!(report.status, ArtifactStatus::Valid);
}

#[test]
fn findings_carry_remediation() {
    let report = validate(
        "run-tests",
        &command("description: Run the test suite\nmodel: haiku\n", SECTIONS),
    );
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "model/short-alias")
        .unwrap();
    assert!(f.remediation.as_deref().unwrap().contains("claude-haiku-4-5"));
    assert!(f.file.as_ref().unwrap().ends_with("run-tests.md"));
}
