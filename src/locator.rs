//! Artifact location and discovery.
//!
//! Name resolution probes, in order:
//! 1. `<dir>/.claude/<kind-dir>`
//! 2. `~/.claude/<kind-dir>`
//! 3. a recursive walk of `<dir>`, accepting a match whose parent directory
//!    is `<kind-dir>`.
//!
//! `<dir>` is `--directory` or the current working directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::artifact::ArtifactKind;
use crate::error::{Error, Result};

/// Directories never descended into while walking.
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target", ".venv", "__pycache__"];

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn walk(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
}

fn parent_name(path: &Path) -> Option<&str> {
    path.parent()?.file_name()?.to_str()
}

/// File or directory name an artifact called `name` has on disk.
fn entry_name(kind: ArtifactKind, name: &str) -> String {
    match kind {
        ArtifactKind::Agent | ArtifactKind::Command => format!("{name}.md"),
        ArtifactKind::Hook => format!("{name}.json"),
        ArtifactKind::Skill => name.to_string(),
    }
}

/// Resolved location for a candidate, if it exists. Skills must be
/// directories holding `SKILL.md`.
fn existing(kind: ArtifactKind, candidate: PathBuf) -> Option<PathBuf> {
    match kind {
        ArtifactKind::Skill => {
            let skill_md = candidate.join("SKILL.md");
            skill_md.is_file().then_some(skill_md)
        }
        _ => candidate.is_file().then_some(candidate),
    }
}

/// Resolves `target` (a path or a bare name) to an artifact file.
///
/// Skills resolve to their `SKILL.md`.
///
/// # Errors
///
/// [`Error::NotFound`] when no candidate root holds the artifact.
pub fn resolve(kind: ArtifactKind, target: &str, dir: &Path) -> Result<PathBuf> {
    let as_path = Path::new(target);
    if as_path.exists() {
        let resolved = match kind {
            ArtifactKind::Skill if as_path.is_dir() => existing(kind, as_path.to_path_buf()),
            _ => as_path.is_file().then(|| as_path.to_path_buf()),
        };
        if let Some(path) = resolved {
            tracing::debug!(path = %path.display(), "resolved artifact from path");
            return Ok(path);
        }
    }

    let name = target.trim_end_matches(".md").trim_end_matches(".json");
    let file = entry_name(kind, name);

    let mut roots = vec![dir.join(".claude").join(kind.dir_name())];
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".claude").join(kind.dir_name()));
    }
    for root in &roots {
        tracing::trace!(root = %root.display(), "probing");
        if let Some(found) = existing(kind, root.join(&file)) {
            return Ok(found);
        }
    }

    for entry in walk(dir) {
        let path = entry.path();
        if entry.file_name().to_str() != Some(file.as_str())
            || parent_name(path) != Some(kind.dir_name())
        {
            continue;
        }
        if let Some(found) = existing(kind, path.to_path_buf()) {
            return Ok(found);
        }
    }

    Err(Error::NotFound {
        kind,
        name: target.to_string(),
    })
}

/// Every artifact of `kind` below `dir`, sorted and de-duplicated.
///
/// - commands: `*.md` in a `commands/` directory or one namespace below it
/// - agents: `*.md` in an `agents/` directory
/// - skills: directories under `skills/` holding a `SKILL.md`
/// - hooks: files named `hooks.json`
pub fn discover(kind: ArtifactKind, dir: &Path) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for entry in walk(dir) {
        let path = entry.path();
        let is_file = entry.file_type().is_file();
        let is_md = is_file && path.extension().is_some_and(|e| e == "md");

        let matched = match kind {
            ArtifactKind::Command => {
                is_md
                    && (parent_name(path) == Some("commands")
                        || path.parent().and_then(parent_name) == Some("commands"))
            }
            ArtifactKind::Agent => is_md && parent_name(path) == Some("agents"),
            ArtifactKind::Skill => {
                entry.file_type().is_dir()
                    && parent_name(path) == Some("skills")
                    && path.join("SKILL.md").is_file()
            }
            ArtifactKind::Hook => is_file && entry.file_name() == "hooks.json",
        };
        if matched {
            found.insert(path.to_path_buf());
        }
    }
    tracing::debug!(kind = %kind, dir = %dir.display(), count = found.len(), "discovered artifacts");
    found.into_iter().collect()
}
