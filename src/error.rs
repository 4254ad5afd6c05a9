//! Error taxonomy shared by the parser, locator, writer and configuration
//! loader.
//!
//! Rule violations are *not* errors: they are [`Finding`](crate::finding::Finding)s.
//! An [`Error`] means an artifact could not be loaded, located, or written.

use std::path::PathBuf;

use crate::artifact::ArtifactKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Name resolution failed in every candidate root.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ArtifactKind, name: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with a `---` delimited metadata block.
    #[error("missing YAML frontmatter (file must start with --- and close with ---)")]
    MissingFrontmatter,

    /// The metadata block is not valid YAML. The decoder message is kept verbatim.
    #[error("invalid YAML: {0}")]
    Yaml(String),

    #[error("frontmatter is not a key/value mapping")]
    NotAMapping,

    #[error("invalid JSON: {message}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    /// Persisting a migrated artifact failed. `restored` reports whether the
    /// backup was copied back over the target.
    #[error("failed to write {}: {source}{}", path.display(), if *restored { " (original restored from backup)" } else { " (restore from backup FAILED)" })]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        restored: bool,
    },

    #[error("{0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors raised while decoding an artifact's metadata.
    ///
    /// Audits report these as `parse_error` rather than `errors`.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::MissingFrontmatter | Error::Yaml(_) | Error::NotAMapping | Error::Json { .. }
        )
    }
}
