//! Artifact parsing and rendering.
//!
//! Markdown artifacts are split with a single regular expression into a YAML
//! frontmatter block and a body; there is no fallback when the delimiters are
//! missing. Hook-sets are decoded as whole-file JSON. Rendering is the exact
//! inverse used by the migrator's writer path: `---\n<yaml>---\n<body>`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::artifact::{identity_for, Artifact, ArtifactKind, Metadata};
use crate::error::{Error, Result};

/// Opening `---` line, lazily matched metadata block (possibly empty), closing
/// `---` line, then the body.
static RE_FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Result of splitting a Markdown artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub metadata: Mapping,
    pub body: String,
    /// 1-based line number where the body starts.
    pub body_line: usize,
}

/// Splits `content` into decoded frontmatter and body.
///
/// # Errors
///
/// - [`Error::MissingFrontmatter`] when the delimiter structure is absent.
/// - [`Error::Yaml`] with the decoder's message when the block is malformed.
/// - [`Error::NotAMapping`] when the block decodes to a scalar or sequence.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter> {
    let caps = RE_FRONTMATTER
        .captures(content)
        .ok_or(Error::MissingFrontmatter)?;
    let block = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(0).map_or(0, |m| m.end());

    let metadata = decode_mapping(block)?;
    let body = content[end..].to_string();
    let body_line = content[..end].matches('\n').count() + 1;

    Ok(Frontmatter {
        metadata,
        body,
        body_line,
    })
}

fn decode_mapping(block: &str) -> Result<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(block).map_err(|e| Error::Yaml(e.to_string()))?;
    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::NotAMapping),
    }
}

/// Decodes a hook-set document.
///
/// # Errors
///
/// [`Error::Json`] carrying the decoder message with its line and column.
pub fn parse_hooks(content: &str) -> Result<serde_json::Value> {
    serde_json::from_str(content).map_err(|e| Error::Json {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
    })
}

/// Reads and parses the artifact at `location`.
///
/// For skills, `location` may be the skill directory or its `SKILL.md`.
pub fn load(kind: ArtifactKind, location: &Path) -> Result<Artifact> {
    let location = if kind == ArtifactKind::Skill && location.is_dir() {
        location.join("SKILL.md")
    } else {
        location.to_path_buf()
    };
    let content = std::fs::read_to_string(&location).map_err(|e| Error::io(&location, e))?;
    let identity = identity_for(kind, &location);

    let artifact = match kind {
        ArtifactKind::Hook => Artifact {
            kind,
            identity,
            metadata: Metadata::Hooks(parse_hooks(&content)?),
            body: None,
            location,
            body_line: 1,
        },
        _ => {
            let fm = parse_frontmatter(&content)?;
            Artifact {
                kind,
                identity,
                metadata: Metadata::Frontmatter(fm.metadata),
                body: Some(fm.body),
                location,
                body_line: fm.body_line,
            }
        }
    };
    tracing::debug!(kind = %artifact.kind, identity = %artifact.identity, path = %artifact.location.display(), "parsed artifact");
    Ok(artifact)
}

/// Renders frontmatter and body back into Markdown artifact text.
pub fn render_frontmatter(metadata: &Mapping, body: &str) -> Result<String> {
    let yaml = if metadata.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(metadata).map_err(|e| Error::Yaml(e.to_string()))?
    };
    Ok(format!("---\n{yaml}---\n{body}"))
}

/// Renders a hook-set as two-space indented JSON with a trailing newline.
pub fn render_hooks(value: &serde_json::Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| Error::Json {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
    })?;
    text.push('\n');
    Ok(text)
}

/// Renders any metadata variant together with an optional body.
pub fn render(metadata: &Metadata, body: Option<&str>) -> Result<String> {
    match metadata {
        Metadata::Frontmatter(m) => render_frontmatter(m, body.unwrap_or("")),
        Metadata::Hooks(v) => render_hooks(v),
    }
}
