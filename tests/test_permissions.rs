#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use plugin_lint::artifact::ArtifactKind;
use plugin_lint::audit;
use plugin_lint::config::Config;
use plugin_lint::parser;
use plugin_lint::permissions::{candidates, fix_permissions};

fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

fn write(path: &Path, content: &str, mode: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
}

#[test]
fn skill_scripts_become_executable() {
    let dir = tempfile::tempdir().unwrap();
    let skill = dir.path().join("skills/processing-pdfs");
    write(
        &skill.join("SKILL.md"),
        "---\nname: processing-pdfs\ndescription: Extracts PDF text. Use when asked.\n---\nRun {baseDir}/scripts/extract.sh\n",
        0o644,
    );
    write(&skill.join("scripts/extract.sh"), "#!/bin/sh\n", 0o644);
    write(&skill.join("scripts/ready.py"), "print()\n", 0o755);
    write(&skill.join("scripts/README.txt"), "notes\n", 0o644);

    let artifact = parser::load(ArtifactKind::Skill, &skill).unwrap();
    assert_eq!(candidates(&artifact), [skill.join("scripts/extract.sh")]);

    let fixed = fix_permissions(&artifact).unwrap();
    assert_eq!(fixed, [skill.join("scripts/extract.sh")]);
    assert_eq!(mode(&skill.join("scripts/extract.sh")), 0o755);
    assert_eq!(mode(&skill.join("scripts/README.txt")), 0o644);

    let report = audit::validate_path(ArtifactKind::Skill, &skill, &Config::default());
    assert!(!report.has_rule("fs/not-executable"));
}

#[test]
fn hook_scripts_become_executable() {
    let dir = tempfile::tempdir().unwrap();
    let hooks = dir.path().join("hooks/hooks.json");
    write(
        &hooks,
        r#"{"hooks": {"Stop": [{"hooks": [{"type": "command", "command": "bash ${CLAUDE_PLUGIN_ROOT}/scripts/lint.sh"}]}]}}"#,
        0o644,
    );
    let script = dir.path().join("scripts/lint.sh");
    write(&script, "#!/bin/sh\n", 0o600);

    let artifact = parser::load(ArtifactKind::Hook, &hooks).unwrap();
    let fixed = fix_permissions(&artifact).unwrap();
    assert_eq!(fixed, [script.clone()]);
    assert_eq!(mode(&script), 0o711);
}

#[test]
fn nothing_to_fix() {
    let dir = tempfile::tempdir().unwrap();
    let skill = dir.path().join("skills/processing-pdfs");
    write(
        &skill.join("SKILL.md"),
        "---\nname: processing-pdfs\ndescription: Extracts PDF text. Use when asked.\n---\n",
        0o644,
    );
    let artifact = parser::load(ArtifactKind::Skill, &skill).unwrap();
    assert!(fix_permissions(&artifact).unwrap().is_empty());
}
