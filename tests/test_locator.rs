use std::path::{Path, PathBuf};

use plugin_lint::artifact::ArtifactKind;
use plugin_lint::error::Error;
use plugin_lint::locator::{discover, resolve};

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "---\n---\n").unwrap();
    path
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

#[test]
fn resolves_from_project_claude_dir() {
    let dir = tempfile::tempdir().unwrap();
    let expected = touch(dir.path(), ".claude/commands/zz-locator-sample.md");
    let found = resolve(ArtifactKind::Command, "zz-locator-sample", dir.path()).unwrap();
    assert_eq!(found, expected);
}

#[test]
fn name_with_extension_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let expected = touch(dir.path(), ".claude/agents/zz-locator-agent.md");
    let found = resolve(ArtifactKind::Agent, "zz-locator-agent.md", dir.path()).unwrap();
    assert_eq!(found, expected);
}

#[test]
fn falls_back_to_walking_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    let expected = touch(dir.path(), "plugins/tools/commands/zz-walked-cmd.md");
    let found = resolve(ArtifactKind::Command, "zz-walked-cmd", dir.path()).unwrap();
    assert_eq!(found, expected);
}

#[test]
fn walk_requires_the_kind_directory() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "docs/zz-stray-cmd.md");
    let err = resolve(ArtifactKind::Command, "zz-stray-cmd", dir.path()).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.to_string(), "command not found: zz-stray-cmd");
}

#[test]
fn skills_resolve_to_skill_md() {
    let dir = tempfile::tempdir().unwrap();
    let expected = touch(dir.path(), "plugin/skills/zz-processing-sample/SKILL.md");
    let found = resolve(ArtifactKind::Skill, "zz-processing-sample", dir.path()).unwrap();
    assert_eq!(found, expected);
}

#[test]
fn explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = touch(dir.path(), "anywhere/hooks.json");
    let found = resolve(ArtifactKind::Hook, path.to_str().unwrap(), dir.path()).unwrap();
    assert_eq!(found, path);

    let skill = touch(dir.path(), "x/my-skill/SKILL.md");
    let skill_dir = skill.parent().unwrap();
    let found = resolve(ArtifactKind::Skill, skill_dir.to_str().unwrap(), dir.path()).unwrap();
    assert_eq!(found, skill);
}

// ---------------------------------------------------------------------------
// discover
// ---------------------------------------------------------------------------

#[test]
fn discovers_commands_and_one_namespace_level() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "commands/run-tests.md");
    touch(root, "commands/git/commit-changes.md");
    touch(root, "commands/git/deep/ignored.md");
    touch(root, "commands/notes.txt");
    touch(root, "docs/readme.md");

    assert_eq!(
        discover(ArtifactKind::Command, root),
        [
            root.join("commands/git/commit-changes.md"),
            root.join("commands/run-tests.md"),
        ]
    );
}

#[test]
fn discovers_skill_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "skills/processing-pdfs/SKILL.md");
    std::fs::create_dir_all(root.join("skills/empty-skill")).unwrap();

    assert_eq!(
        discover(ArtifactKind::Skill, root),
        [root.join("skills/processing-pdfs")]
    );
}

#[test]
fn skips_vendored_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "agents/reviewer.md");
    touch(root, "node_modules/pkg/agents/vendored.md");
    touch(root, "hooks/hooks.json");
    touch(root, ".git/hooks/hooks.json");

    assert_eq!(
        discover(ArtifactKind::Agent, root),
        [root.join("agents/reviewer.md")]
    );
    assert_eq!(
        discover(ArtifactKind::Hook, root),
        [root.join("hooks/hooks.json")]
    );
}
