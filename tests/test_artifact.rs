use std::path::Path;

use plugin_lint::artifact::{identity_for, split_tool_list, Artifact, ArtifactKind, Metadata};
use plugin_lint::parser::parse_frontmatter;

fn artifact(kind: ArtifactKind, location: &str, content: &str) -> Artifact {
    let fm = parse_frontmatter(content).unwrap();
    Artifact {
        kind,
        identity: identity_for(kind, Path::new(location)),
        metadata: Metadata::Frontmatter(fm.metadata),
        body: Some(fm.body),
        location: location.into(),
        body_line: fm.body_line,
    }
}

#[test]
fn command_identity_is_file_stem() {
    assert_eq!(
        identity_for(ArtifactKind::Command, Path::new("plugin/commands/run-tests.md")),
        "run-tests"
    );
}

#[test]
fn skill_identity_is_directory_name() {
    assert_eq!(
        identity_for(ArtifactKind::Skill, Path::new("skills/processing-pdfs/SKILL.md")),
        "processing-pdfs"
    );
    assert_eq!(
        identity_for(ArtifactKind::Skill, Path::new("skills/processing-pdfs")),
        "processing-pdfs"
    );
}

#[test]
fn scoped_tools_reduce_to_base_names() {
    let a = artifact(
        ArtifactKind::Command,
        "commands/commit-changes.md",
        "---\nallowed-tools: Read, Bash(git add:*, git commit:*), Edit\n---\n",
    );
    assert_eq!(a.tools(), ["Read", "Bash", "Edit"]);
}

#[test]
fn sequence_tools_are_accepted() {
    let a = artifact(
        ArtifactKind::Agent,
        "agents/reviewer.md",
        "---\ntools:\n  - Read\n  - Grep\n---\n",
    );
    assert_eq!(a.tools(), ["Read", "Grep"]);
}

#[test]
fn legacy_tools_key_is_read_for_commands() {
    let a = artifact(
        ArtifactKind::Command,
        "commands/run-tests.md",
        "---\ntools: Read, Bash\n---\n",
    );
    assert_eq!(a.tools(), ["Read", "Bash"]);
}

#[test]
fn split_keeps_parenthesised_commas_together() {
    assert_eq!(
        split_tool_list("Read, Bash(git add:*, git commit:*), Edit"),
        ["Read", "Bash(git add:*, git commit:*)", "Edit"]
    );
}

#[test]
fn field_accessors() {
    let a = artifact(
        ArtifactKind::Agent,
        "agents/reviewer.md",
        "---\nname: reviewer\nmodel: sonnet\n---\n# Reviewer\n",
    );
    assert_eq!(a.field_str("name"), Some("reviewer"));
    assert!(a.has_field("model"));
    assert!(!a.has_field("description"));
    assert_eq!(a.body(), "# Reviewer\n");
    assert_eq!(a.base_dir(), Path::new("agents"));
}
