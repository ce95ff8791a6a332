#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;
use tempfile::TempDir;
use thermostat_store::storage::{OpenOptions, ScheduleStore};

pub mod assertions;
pub mod scenarios;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        thermostat_store::logging::init_test_logging();
    });
}

pub fn test_store() -> ScheduleStore {
    init_test_logging();
    ScheduleStore::open_memory(&OpenOptions::default()).expect("Failed to create test database")
}

pub fn test_db_path(dir: &TempDir) -> PathBuf {
    dir.path().join(".thermo").join("thermostat.db")
}

pub fn test_store_with_dir() -> (ScheduleStore, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = ScheduleStore::open(&test_db_path(&dir), &OpenOptions::default())
        .expect("Failed to create test database");
    (store, dir)
}

pub fn options_with_version(schema_version: i64) -> OpenOptions {
    OpenOptions {
        schema_version,
        ..OpenOptions::default()
    }
}
