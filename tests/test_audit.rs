use std::path::Path;

use plugin_lint::artifact::ArtifactKind;
use plugin_lint::audit::{audit_paths, run_audit};
use plugin_lint::config::Config;
use plugin_lint::finding::ArtifactStatus;

const GOOD: &str =
    "---\ndescription: Run the test suite\n---\n# Run\n\n## Workflow\n\n1. Run\n\n## Examples\n\n/run-tests\n";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[test]
fn malformed_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "commands/build-docs.md", GOOD);
    write(dir.path(), "commands/check-links.md", "---\ndescription: [unclosed\n---\n");
    write(dir.path(), "commands/run-tests.md", GOOD);

    let batch = run_audit(ArtifactKind::Command, dir.path(), &Config::default());
    assert_eq!(batch.reports.len(), 3);
    assert_eq!(batch.count(ArtifactStatus::ParseError), 1);
    assert_eq!(batch.count(ArtifactStatus::Valid), 2);

    let broken = &batch.reports[1];
    assert_eq!(broken.identity, "check-links");
    assert!(broken.parse_error.as_deref().unwrap().contains("YAML"));
    assert!(broken.findings.is_empty());
    assert_eq!(batch.exit_code(), 1);
}

#[test]
fn missing_file_is_a_parse_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let ghost = dir.path().join("agents/ghost.md");
    let batch = audit_paths(ArtifactKind::Agent, &[ghost], &Config::default());
    assert_eq!(batch.reports[0].status, ArtifactStatus::ParseError);
    assert_eq!(batch.reports[0].identity, "ghost");
}

#[test]
fn warnings_only_batch_passes() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "commands/run-tests.md",
        "---\ndescription: Tests\n---\n## Workflow\n\n## Examples\n",
    );
    let batch = run_audit(ArtifactKind::Command, dir.path(), &Config::default());
    assert_eq!(batch.count(ArtifactStatus::Warnings), 1);
    assert!(batch.passed());
    assert_eq!(batch.exit_code(), 0);
}

#[test]
fn strict_mode_fails_on_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "commands/run-tests.md",
        "---\ndescription: Tests\n---\n## Workflow\n\n## Examples\n",
    );
    let mut config = Config::default();
    config.strict.enabled = true;
    let batch = run_audit(ArtifactKind::Command, dir.path(), &config);
    assert_eq!(batch.count(ArtifactStatus::Errors), 1);
    assert_eq!(batch.exit_code(), 1);
}

#[test]
fn empty_directory_yields_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let batch = run_audit(ArtifactKind::Skill, dir.path(), &Config::default());
    assert!(batch.reports.is_empty());
    assert_eq!(batch.exit_code(), 0);
}
