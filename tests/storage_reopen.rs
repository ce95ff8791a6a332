mod common;

use common::scenarios::fields;
use common::{init_test_logging, options_with_version, test_db_path, test_store_with_dir};
use rusqlite::Connection;
use std::fs;
use tempfile::TempDir;
use thermostat_store::error::{ErrorCode, ThermoError};
use thermostat_store::storage::{
    MAX_SCHEMA_VERSION, OpenOptions, ScheduleStore, VersionChangePolicy,
};

fn stored_user_version(path: &std::path::Path) -> i64 {
    let conn = Connection::open(path).expect("open db");
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .expect("user_version")
}

#[test]
fn reopen_same_version_preserves_rows() {
    let (store, dir) = test_store_with_dir();
    store.add(&fields(0)).unwrap();
    store.add(&fields(1)).unwrap();
    let before = store.get_all().unwrap();
    store.close().unwrap();

    let reopened = ScheduleStore::open(&test_db_path(&dir), &OpenOptions::default()).unwrap();
    assert_eq!(reopened.get_all().unwrap(), before);

    // ids keep increasing across sessions
    assert_eq!(reopened.add(&fields(2)).unwrap(), Some(3));
}

#[test]
fn reopen_with_new_version_recreates_table() {
    let (store, dir) = test_store_with_dir();
    store.add(&fields(0)).unwrap();
    store.add(&fields(1)).unwrap();
    drop(store);

    let path = test_db_path(&dir);
    let upgraded = ScheduleStore::open(&path, &options_with_version(4)).unwrap();
    assert!(upgraded.get_all().unwrap().is_empty());
    assert_eq!(upgraded.add(&fields(0)).unwrap(), Some(1));
    drop(upgraded);
    assert_eq!(stored_user_version(&path), 4);

    let downgraded = ScheduleStore::open(&path, &options_with_version(2)).unwrap();
    assert!(downgraded.get_all().unwrap().is_empty());
    drop(downgraded);
    assert_eq!(stored_user_version(&path), 2);
}

#[test]
fn refuse_policy_keeps_rows_on_mismatch() {
    let (store, dir) = test_store_with_dir();
    store.add(&fields(0)).unwrap();
    store.close().unwrap();

    let path = test_db_path(&dir);
    let options = OpenOptions {
        schema_version: 9,
        on_version_change: VersionChangePolicy::Refuse,
        ..OpenOptions::default()
    };
    let err = ScheduleStore::open(&path, &options).unwrap_err();
    assert_eq!(err.code(), ErrorCode::SchemaVersionMismatch);

    let store = ScheduleStore::open(&path, &OpenOptions::default()).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn open_creates_missing_parent_directories() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("schedule.db");
    let store = ScheduleStore::open(&path, &OpenOptions::default()).unwrap();
    store.close().unwrap();
    assert!(path.exists());
}

#[test]
fn open_fails_when_parent_is_a_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let err = ScheduleStore::open(&blocker.join("schedule.db"), &OpenOptions::default())
        .unwrap_err();
    assert!(matches!(err, ThermoError::Open { .. }), "got {err:?}");
}

#[test]
fn open_fails_on_non_database_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.db");
    fs::write(&path, vec![0x42_u8; 4096]).unwrap();

    let err = ScheduleStore::open(&path, &OpenOptions::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OpenFailed, "got {err:?}");
}

#[test]
fn invalid_schema_version_is_rejected() {
    init_test_logging();
    let err = ScheduleStore::open_memory(&options_with_version(0)).unwrap_err();
    assert!(matches!(err, ThermoError::InvalidSchemaVersion(0)));
}

#[test]
fn unstorable_schema_version_leaves_database_untouched() {
    let (store, dir) = test_store_with_dir();
    store.add(&fields(0)).unwrap();
    store.close().unwrap();

    let path = test_db_path(&dir);
    let err = ScheduleStore::open(&path, &options_with_version(5_000_000_000)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidSchemaVersion);
    assert_eq!(stored_user_version(&path), 3);

    // The stored version is still real, so a change still recreates.
    let store = ScheduleStore::open(&path, &options_with_version(4)).unwrap();
    assert_eq!(store.count().unwrap(), 0);
    drop(store);
    assert_eq!(stored_user_version(&path), 4);
}

#[test]
fn largest_storable_schema_version_survives_reopen() {
    let (store, dir) = test_store_with_dir();
    store.close().unwrap();

    let path = test_db_path(&dir);
    let options = options_with_version(MAX_SCHEMA_VERSION);
    let store = ScheduleStore::open(&path, &options).unwrap();
    store.add(&fields(0)).unwrap();
    store.close().unwrap();
    assert_eq!(stored_user_version(&path), MAX_SCHEMA_VERSION);

    let store = ScheduleStore::open(&path, &options).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[cfg(unix)]
#[test]
fn read_only_database_is_an_open_failure() {
    use std::os::unix::fs::PermissionsExt;

    let (store, dir) = test_store_with_dir();
    store.add(&fields(0)).unwrap();
    store.close().unwrap();

    let path = test_db_path(&dir);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();
    if fs::OpenOptions::new().write(true).open(&path).is_ok() {
        // Permission bits are not enforced for this user (e.g. root).
        return;
    }

    let err = ScheduleStore::open(&path, &OpenOptions::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OpenFailed, "got {err:?}");
    assert!(matches!(err, ThermoError::Open { .. }));
}
