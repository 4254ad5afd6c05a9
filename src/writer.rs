//! Transactional file writes.
//!
//! [`write_with_backup`] is the only path through which an artifact is
//! mutated: copy the original to a backup, write the new text, and copy the
//! backup back if the write fails.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::BackupStyle;
use crate::error::{Error, Result};

/// Name of the backup created for `path` at time `now`.
///
/// ```
/// use std::path::Path;
/// use plugin_lint::config::BackupStyle;
/// use plugin_lint::writer::backup_path;
///
/// let now = chrono::Local::now();
/// let bak = backup_path(Path::new("commands/run-tests.md"), BackupStyle::Suffix, now);
/// assert_eq!(bak, Path::new("commands/run-tests.md.bak"));
/// ```
pub fn backup_path(path: &Path, style: BackupStyle, now: DateTime<Local>) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = match style {
        BackupStyle::Suffix => ".bak".to_string(),
        BackupStyle::Timestamp => format!(".pre-migration-{}", now.format("%Y%m%d_%H%M%S")),
    };
    path.with_file_name(format!("{file_name}{suffix}"))
}

/// Replaces the contents of `path` with `contents`, keeping a backup.
///
/// Returns the backup path on success.
///
/// # Errors
///
/// - [`Error::Io`] when the backup cannot be created; the original is untouched.
/// - [`Error::WriteFailure`] when writing fails; `restored` reports whether
///   the original was copied back from the backup.
pub fn write_with_backup(path: &Path, contents: &str, style: BackupStyle) -> Result<PathBuf> {
    let backup = backup_path(path, style, Local::now());
    fs::copy(path, &backup).map_err(|e| Error::io(&backup, e))?;
    tracing::debug!(backup = %backup.display(), "created backup");

    match fs::write(path, contents) {
        Ok(()) => Ok(backup),
        Err(source) => {
            let restored = restore_from_backup(&backup, path).is_ok();
            if restored {
                tracing::warn!(path = %path.display(), "write failed, original restored from backup");
            } else {
                tracing::error!(
                    path = %path.display(),
                    backup = %backup.display(),
                    "write failed and restore failed"
                );
            }
            Err(Error::WriteFailure {
                path: path.to_path_buf(),
                source,
                restored,
            })
        }
    }
}

/// Copies `backup` over `original`.
pub fn restore_from_backup(backup: &Path, original: &Path) -> Result<()> {
    fs::copy(backup, original).map_err(|e| Error::io(original, e))?;
    Ok(())
}
