//! Filesystem rules: referenced scripts and skill resource directories.
//!
//! These are the only checks that touch the disk. Missing execute bits are
//! reported here and repaired by [`crate::permissions`], never by the engine.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use super::{finding, hooks, RuleInfo};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::finding::{Category, Finding, Severity};

static RE_BASEDIR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{baseDir\}/([^\s`'"()\[\]<>]+)"#).unwrap());

/// Skill subdirectories whose contents are addressed through `{baseDir}`.
pub const RESOURCE_DIRS: &[&str] = &["scripts", "references", "assets", "templates"];

const SCRIPT_EXTENSIONS: &[&str] = &["sh", "py"];

/// Returns `true` if any execute bit is set. Always `true` off Unix.
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        true
    }
}

/// `*.sh` and `*.py` files below a skill's `scripts/` directory.
pub fn skill_script_files(skill_dir: &Path) -> Vec<PathBuf> {
    let scripts = skill_dir.join("scripts");
    if !scripts.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(&scripts)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext.as_str()))
        })
        .collect();
    files.sort();
    files
}

/// Resolves a script path written in a hook command.
///
/// `${CLAUDE_PLUGIN_ROOT}` is the plugin directory: the parent of a `hooks/`
/// directory holding the hook file, otherwise the hook file's directory.
/// Relative paths resolve against the hook file's directory. Absolute paths
/// and paths built from other variables are not resolved.
pub fn resolve_hook_script(hook_dir: &Path, script: &str) -> Option<PathBuf> {
    let plugin_root = || {
        if hook_dir.file_name().is_some_and(|n| n == "hooks") {
            hook_dir.parent().unwrap_or(hook_dir).to_path_buf()
        } else {
            hook_dir.to_path_buf()
        }
    };
    if let Some(rest) = script
        .strip_prefix(hooks::PLUGIN_ROOT_VAR)
        .or_else(|| script.strip_prefix("$CLAUDE_PLUGIN_ROOT"))
    {
        return Some(plugin_root().join(rest.trim_start_matches('/')));
    }
    if script.starts_with('/') || script.contains('$') {
        return None;
    }
    Some(hook_dir.join(script))
}

/// Scripts referenced by a hook-set's commands, resolved and de-duplicated.
pub fn hook_script_paths(a: &Artifact) -> Vec<PathBuf> {
    let Some(root) = a.hooks() else {
        return Vec::new();
    };
    let mut paths = BTreeSet::new();
    for item in hooks::hook_items(root) {
        let Some(command) = item.command() else {
            continue;
        };
        for script in hooks::script_references(command) {
            if let Some(path) = resolve_hook_script(a.base_dir(), script) {
                paths.insert(path);
            }
        }
    }
    paths.into_iter().collect()
}

/// `{baseDir}/...` references in a skill body, with their absolute line.
fn base_dir_references(a: &Artifact) -> Vec<(usize, PathBuf)> {
    let mut refs = Vec::new();
    for (idx, line) in a.body().lines().enumerate() {
        for caps in RE_BASEDIR_REF.captures_iter(line) {
            if let Some(m) = caps.get(1) {
                let rel = m.as_str().trim_end_matches(['.', ',', ':', ';']);
                refs.push((a.body_line + idx, a.base_dir().join(rel)));
            }
        }
    }
    refs
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e.as_str()))
}

fn display_rel(a: &Artifact, path: &Path) -> String {
    path.strip_prefix(a.base_dir())
        .unwrap_or(path)
        .display()
        .to_string()
}

pub(crate) fn check_skill_scripts(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let mut reported = BTreeSet::new();

    for (line, path) in base_dir_references(a) {
        if !reported.insert(path.clone()) {
            continue;
        }
        if !path.exists() {
            out.push(
                finding(
                    a,
                    "fs/missing-script",
                    format!("Referenced file '{}' does not exist", display_rel(a, &path)),
                )
                .with_line(line),
            );
        } else if path.is_file() && is_script(&path) && !is_executable(&path) {
            out.push(
                finding(
                    a,
                    "fs/not-executable",
                    format!("Script '{}' is not executable", display_rel(a, &path)),
                )
                .with_line(line),
            );
        }
    }

    for path in skill_script_files(a.base_dir()) {
        if reported.contains(&path) || is_executable(&path) {
            continue;
        }
        out.push(
            finding(
                a,
                "fs/not-executable",
                format!("Script '{}' is not executable", display_rel(a, &path)),
            )
            .at(path.clone(), None),
        );
    }
}

/// Accepted interpreter lines per script extension.
const SHEBANGS: &[(&str, &[&str])] = &[
    ("sh", &["#!/bin/bash", "#!/usr/bin/env bash"]),
    ("py", &["#!/usr/bin/env python3"]),
];

/// First line of a script, or `None` when it cannot be read as text.
fn first_line(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text.lines().next().unwrap_or_default().trim_end().to_string()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping shebang check");
            None
        }
    }
}

pub(crate) fn check_skill_shebangs(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    for path in skill_script_files(a.base_dir()) {
        let Some(line) = first_line(&path) else {
            continue;
        };
        let name = display_rel(a, &path);
        if !line.starts_with("#!") {
            out.push(
                finding(a, "fs/missing-shebang", format!("Script '{name}' has no shebang line"))
                    .at(path.clone(), Some(1)),
            );
            continue;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let Some((_, expected)) = SHEBANGS.iter().find(|(e, _)| *e == ext) else {
            continue;
        };
        if !expected.contains(&line.as_str()) {
            out.push(
                finding(
                    a,
                    "fs/unexpected-shebang",
                    format!("Script '{name}' starts with '{line}', expected '{}'", expected[0]),
                )
                .at(path.clone(), Some(1))
                .with_snippet(line),
            );
        }
    }
}

pub(crate) fn check_base_dir(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    let present: Vec<&str> = RESOURCE_DIRS
        .iter()
        .copied()
        .filter(|d| a.base_dir().join(d).is_dir())
        .collect();
    if present.is_empty() || a.body().contains("{baseDir}") {
        return;
    }
    out.push(finding(
        a,
        "fs/unused-basedir",
        format!(
            "Skill has {} but the body never references {{baseDir}}",
            present.join(", ")
        ),
    ));
}

pub(crate) fn check_hook_scripts(a: &Artifact, _config: &Config, out: &mut Vec<Finding>) {
    for path in hook_script_paths(a) {
        if !path.exists() {
            out.push(finding(
                a,
                "fs/missing-script",
                format!("Hook script '{}' does not exist", path.display()),
            ));
        } else if !is_executable(&path) {
            out.push(finding(
                a,
                "fs/not-executable",
                format!("Hook script '{}' is not executable", path.display()),
            ));
        }
    }
}

pub fn rules() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: "fs/missing-script",
            severity: Severity::Critical,
            category: Category::Filesystem,
            kinds: &[ArtifactKind::Hook, ArtifactKind::Skill],
            message: "Referenced script or resource does not exist",
            remediation: "Create the file or fix the path",
        },
        RuleInfo {
            id: "fs/not-executable",
            severity: Severity::Warning,
            category: Category::Filesystem,
            kinds: &[ArtifactKind::Hook, ArtifactKind::Skill],
            message: "Script lacks an execute bit",
            remediation: "Run 'plugin-lint fix-permissions <kind> <name>' or chmod +x the script",
        },
        RuleInfo {
            id: "fs/unused-basedir",
            severity: Severity::Warning,
            category: Category::Filesystem,
            kinds: &[ArtifactKind::Skill],
            message: "Skill ships resource directories but never references {baseDir}",
            remediation: "Reference bundled files as {baseDir}/scripts/<file> so they resolve from any directory",
        },
        RuleInfo {
            id: "fs/missing-shebang",
            severity: Severity::Warning,
            category: Category::Filesystem,
            kinds: &[ArtifactKind::Skill],
            message: "Skill script has no shebang line",
            remediation: "Start the script with '#!/bin/bash' or '#!/usr/bin/env python3'",
        },
        RuleInfo {
            id: "fs/unexpected-shebang",
            severity: Severity::Recommendation,
            category: Category::Filesystem,
            kinds: &[ArtifactKind::Skill],
            message: "Skill script uses an unexpected interpreter line",
            remediation: "Use '#!/bin/bash' for .sh and '#!/usr/bin/env python3' for .py scripts",
        },
    ]
}
