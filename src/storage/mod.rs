//! `SQLite` storage layer for `thermostat_store`.
//!
//! # Submodules
//!
//! - [`schema`] - Table descriptors and create/version-change lifecycle
//! - [`table`] - Generic CRUD over a described table
//! - [`sqlite`] - The schedule store

pub mod schema;
pub mod sqlite;
pub mod table;

pub use schema::{
    DEFAULT_SCHEMA_VERSION, MAX_SCHEMA_VERSION, SCHEDULE_TABLE, TableDescriptor,
    VersionChangePolicy,
};
pub use sqlite::{NOT_FOUND_ID, OpenOptions, ScheduleStore};
pub use table::{ConflictPolicy, StoredRow, Table};
