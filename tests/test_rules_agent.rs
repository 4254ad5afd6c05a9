use plugin_lint::artifact::ArtifactKind;
use plugin_lint::audit;
use plugin_lint::config::Config;
use plugin_lint::finding::{ArtifactReport, ArtifactStatus, Severity};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SECTIONS: &str =
    "\n## Capabilities\n\n- Reviews diffs\n\n## Workflow\n\n1. Read\n\n## Examples\n\nReview PR 12\n";

fn validate(name: &str, content: &str) -> ArtifactReport {
    let dir = tempfile::tempdir().unwrap();
    let agents = dir.path().join("agents");
    std::fs::create_dir_all(&agents).unwrap();
    let path = agents.join(format!("{name}.md"));
    std::fs::write(&path, content).unwrap();
    audit::validate_path(ArtifactKind::Agent, &path, &Config::default())
}

fn agent(frontmatter: &str, body: &str) -> String {
    format!("---\n{frontmatter}---\n# Reviewer\n{body}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn short_aliases_are_valid_for_agents() {
    for model in ["haiku", "sonnet", "opus", "inherit", "claude-opus-4-1"] {
        let fm = format!("name: code-reviewer\ndescription: Reviews pull requests\nmodel: {model}\n");
        let report = validate("code-reviewer", &agent(&fm, SECTIONS));
        assert!(
            !report.has_rule("model/unrecognized") && !report.has_rule("model/short-alias"),
            "model {model} should be accepted"
        );
    }
}

#[test]
fn clean_agent_is_valid() {
    let report = validate(
        "code-reviewer",
        &agent(
            "name: code-reviewer\ndescription: Reviews pull requests\ntools: Read, Grep, Glob\nmodel: sonnet\n",
            SECTIONS,
        ),
    );
    assert_eq!(report.status, ArtifactStatus::Valid, "{:?}", report.findings);
}

#[test]
fn missing_name_and_description() {
    let report = validate("code-reviewer", &agent("model: sonnet\n", SECTIONS));
    assert!(report.has_rule("schema/missing-name"));
    assert!(report.has_rule("schema/missing-description"));
    assert_eq!(report.count(Severity::Critical), 2);
}

#[test]
fn name_mismatch_is_a_warning() {
    let report = validate(
        "code-reviewer",
        &agent("name: reviewer\ndescription: Reviews pull requests\n", SECTIONS),
    );
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "naming/name-mismatch")
        .unwrap();
    assert_eq!(f.severity, Severity::Warning);
}

#[test]
fn write_with_edit_is_redundant() {
    let report = validate(
        "code-reviewer",
        &agent(
            "name: code-reviewer\ndescription: Reviews pull requests\ntools: Read, Write, Edit\n",
            SECTIONS,
        ),
    );
    assert!(report.has_rule("tools/redundant-write"));
    assert!(!report.has_rule("tools/deprecated-field"));
}

#[test]
fn missing_sections_lists_every_section() {
    let report = validate(
        "code-reviewer",
        &agent("name: code-reviewer\ndescription: Reviews pull requests\n", "\nJust text.\n"),
    );
    let f = report
        .findings
        .iter()
        .find(|f| f.rule_id == "content/missing-sections")
        .unwrap();
    assert!(f.message.contains("Capabilities"));
    assert!(f.message.contains("Workflow"));
    assert!(f.message.contains("Examples"));
}

#[test]
fn body_without_frontmatter_is_a_parse_error() {
    let report = validate("code-reviewer", "# Reviewer\n\nYou are a reviewer.\n");
    assert_eq!(report.status, ArtifactStatus::ParseError);
    assert!(report.parse_error.is_some());
    assert_eq!(report.identity, "code-reviewer");
}
