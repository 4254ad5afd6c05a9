//! Core artifact model.
//!
//! An [`Artifact`] is one configuration unit loaded from disk: an agent or
//! command (`<identity>.md`), a skill (`<identity>/SKILL.md`), or a hook-set
//! (`hooks.json`). Markdown artifacts carry an ordered YAML mapping plus a
//! free-text body; hook-sets carry a JSON tree and no body.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

/// The four artifact kinds managed by this crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Agent,
    Command,
    Hook,
    Skill,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Agent,
        ArtifactKind::Command,
        ArtifactKind::Hook,
        ArtifactKind::Skill,
    ];

    /// Conventional directory name holding artifacts of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArtifactKind::Agent => "agents",
            ArtifactKind::Command => "commands",
            ArtifactKind::Hook => "hooks",
            ArtifactKind::Skill => "skills",
        }
    }

    /// Frontmatter key listing the tools an artifact may use.
    ///
    /// Agents use `tools`; commands and skills use `allowed-tools`. Hook-sets
    /// have no tool list.
    pub fn tools_key(self) -> Option<&'static str> {
        match self {
            ArtifactKind::Agent => Some("tools"),
            ArtifactKind::Command | ArtifactKind::Skill => Some("allowed-tools"),
            ArtifactKind::Hook => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Agent => write!(f, "agent"),
            ArtifactKind::Command => write!(f, "command"),
            ArtifactKind::Hook => write!(f, "hook"),
            ArtifactKind::Skill => write!(f, "skill"),
        }
    }
}

/// Decoded metadata block.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// YAML frontmatter of an agent, command or skill. Key order is preserved.
    Frontmatter(Mapping),
    /// Whole-file JSON of a hook-set.
    Hooks(serde_json::Value),
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Name derived from the file or directory name.
    pub identity: String,
    pub metadata: Metadata,
    /// Text after the closing frontmatter delimiter. `None` for hook-sets.
    pub body: Option<String>,
    /// Resolved file path (`SKILL.md` for skills).
    pub location: PathBuf,
    /// 1-based line number of the first body line.
    pub body_line: usize,
}

impl Artifact {
    /// Frontmatter mapping, or `None` for hook-sets.
    pub fn frontmatter(&self) -> Option<&Mapping> {
        match &self.metadata {
            Metadata::Frontmatter(m) => Some(m),
            Metadata::Hooks(_) => None,
        }
    }

    /// JSON tree of a hook-set, or `None` for Markdown artifacts.
    pub fn hooks(&self) -> Option<&serde_json::Value> {
        match &self.metadata {
            Metadata::Hooks(v) => Some(v),
            Metadata::Frontmatter(_) => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.frontmatter().and_then(|m| m.get(key))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// String value of a frontmatter field. Non-string scalars yield `None`.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Directory the artifact lives in (the skill directory for skills).
    pub fn base_dir(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Tool names granted by the frontmatter, reduced to their base name.
    ///
    /// Accepts the comma-separated string form (`Read, Bash(git:*)`) and the
    /// YAML list form. Scoped entries such as `Bash(git:*)` yield `Bash`.
    /// Commands and skills still using the legacy `tools` key are read from it.
    pub fn tools(&self) -> Vec<String> {
        let Some(key) = self.kind.tools_key() else {
            return Vec::new();
        };
        self.field(key)
            .or_else(|| self.field("tools"))
            .map(tool_names)
            .unwrap_or_default()
    }
}

/// Flattens a tools value into trimmed base tool names.
pub fn tool_names(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::String(s) => split_tool_list(s).into_iter().map(str::to_string).collect(),
        Value::Sequence(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    raw.iter()
        .map(|t| base_tool_name(t).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split a comma-separated tool list on commas that are not inside parentheses.
///
/// `Bash(git add:*, git commit:*), Read` → `["Bash(git add:*, git commit:*)", "Read"]`
pub fn split_tool_list(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    items
}

/// `Bash(git:*)` → `Bash`.
pub fn base_tool_name(entry: &str) -> &str {
    entry.split('(').next().unwrap_or(entry).trim()
}

/// Derives an artifact identity from its resolved location.
///
/// Skills are named after their directory; everything else after the file stem.
pub fn identity_for(kind: ArtifactKind, location: &Path) -> String {
    let component = match kind {
        ArtifactKind::Skill if location.file_name().is_some_and(|n| n == "SKILL.md") => location
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string()),
        ArtifactKind::Skill => location.file_name().map(|n| n.to_string_lossy().to_string()),
        _ => location.file_stem().map(|n| n.to_string_lossy().to_string()),
    };
    component.unwrap_or_else(|| "unknown".to_string())
}
