use std::path::Path;

use chrono::{Local, TimeZone};
use plugin_lint::config::BackupStyle;
use plugin_lint::error::Error;
use plugin_lint::writer::{backup_path, restore_from_backup, write_with_backup};

#[test]
fn suffix_backup_name() {
    let now = Local::now();
    assert_eq!(
        backup_path(Path::new("/p/agents/reviewer.md"), BackupStyle::Suffix, now),
        Path::new("/p/agents/reviewer.md.bak")
    );
}

#[test]
fn timestamp_backup_name() {
    let now = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(
        backup_path(Path::new("agents/reviewer.md"), BackupStyle::Timestamp, now),
        Path::new("agents/reviewer.md.pre-migration-20260102_030405")
    );
}

#[test]
fn write_keeps_original_in_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hooks.json");
    std::fs::write(&path, "{}\n").unwrap();

    let backup = write_with_backup(&path, "{\"hooks\": {}}\n", BackupStyle::Suffix).unwrap();
    assert_eq!(backup, dir.path().join("hooks.json.bak"));
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{}\n");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"hooks\": {}}\n");
}

#[test]
fn timestamped_write_creates_pre_migration_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reviewer.md");
    std::fs::write(&path, "old").unwrap();

    let backup = write_with_backup(&path, "new", BackupStyle::Timestamp).unwrap();
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("reviewer.md.pre-migration-"), "{name}");
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), "old");
}

#[test]
fn unreadable_target_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("commands");
    std::fs::create_dir(&target).unwrap();

    let err = write_with_backup(&target, "text", BackupStyle::Suffix).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err:?}");
    assert!(target.is_dir());
}

#[test]
fn missing_target_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_with_backup(&dir.path().join("nope.md"), "text", BackupStyle::Suffix)
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(!dir.path().join("nope.md").exists());
}

#[test]
fn restore_copies_backup_over_original() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("run-tests.md");
    let backup = dir.path().join("run-tests.md.bak");
    std::fs::write(&original, "broken").unwrap();
    std::fs::write(&backup, "good").unwrap();

    restore_from_backup(&backup, &original).unwrap();
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "good");
}
