//! `SQLite` storage implementation.

use crate::error::{Result, ThermoError};
use crate::model::{EntryFields, ScheduleEntry};
use crate::storage::schema::{
    DEFAULT_SCHEMA_VERSION, SCHEDULE_TABLE, TableDescriptor, VersionChangePolicy, apply_schema,
};
use crate::storage::table::{ConflictPolicy, StoredRow, Table};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Id the CLI reports when no row exists at a position.
pub const NOT_FOUND_ID: i64 = -1;

/// Settings applied when opening a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub schema_version: i64,
    pub on_version_change: VersionChangePolicy,
    pub conflict: ConflictPolicy,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            schema_version: DEFAULT_SCHEMA_VERSION,
            on_version_change: VersionChangePolicy::default(),
            conflict: ConflictPolicy::default(),
        }
    }
}

/// SQLite-backed thermostat schedule store.
#[derive(Debug)]
pub struct ScheduleStore {
    conn: Connection,
    conflict: ConflictPolicy,
}

impl ScheduleStore {
    /// Open (creating if absent) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Open`] if the file cannot be opened or created,
    /// or a schema error if the version handling fails.
    pub fn open(path: &Path, options: &OpenOptions) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| ThermoError::Open {
                path: path.to_path_buf(),
                source: Box::new(err),
            })?;
        }

        let conn = Connection::open(path).map_err(|err| ThermoError::Open {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        info!(path = %path.display(), "opened schedule database");
        Self::init(conn, options).map_err(|err| open_failure(path, err))
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory(options: &OpenOptions) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, options)
    }

    fn init(mut conn: Connection, options: &OpenOptions) -> Result<Self> {
        apply_schema(
            &mut conn,
            &SCHEDULE_TABLE,
            options.schema_version,
            options.on_version_change,
        )?;
        Ok(Self {
            conn,
            conflict: options.conflict,
        })
    }

    /// Close the connection, reporting any error from SQLite.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite fails to close cleanly.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, err)| ThermoError::Database(err))?;
        debug!("closed schedule database");
        Ok(())
    }

    #[must_use]
    pub const fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict
    }

    /// Generic repository view over any table on this connection.
    #[must_use]
    pub fn table(&self, desc: &'static TableDescriptor) -> Table<'_> {
        Table::new(&self.conn, desc, self.conflict)
    }

    fn schedule(&self) -> Table<'_> {
        self.table(&SCHEDULE_TABLE)
    }

    /// Add a schedule entry.
    ///
    /// Returns the assigned id, or `None` if the insert was ignored on conflict.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add(&self, fields: &EntryFields) -> Result<Option<i64>> {
        debug!(day = %fields.day, hour = %fields.hour, temperature = %fields.temperature, "add entry");
        self.schedule().insert(&fields.as_values())
    }

    /// Every entry, in id order.
    ///
    /// A NULL column (only possible through writes outside this store) reads
    /// back as an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> Result<Vec<ScheduleEntry>> {
        let rows = self.schedule().rows()?;
        debug!(count = rows.len(), "loaded schedule entries");
        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    /// Entry with the given id. NULL columns read back as empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<ScheduleEntry>> {
        Ok(self.schedule().get(id)?.map(entry_from_row))
    }

    /// Id of the entry at 0-based `position` in a fresh scan.
    ///
    /// Positions shift after deletes, so this is how callers holding a list
    /// index find the id to pass to [`Self::delete`] or [`Self::update`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn id_at_position(&self, position: usize) -> Result<Option<i64>> {
        self.schedule().id_at(position)
    }

    /// Delete an entry. Returns `false` if no entry had that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        self.schedule().delete(id)
    }

    /// Replace all fields of an entry, keeping its id.
    ///
    /// Returns `false` if no entry had that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update(&self, id: i64, fields: &EntryFields) -> Result<bool> {
        self.schedule().update(id, &fields.as_values())
    }

    /// Number of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize> {
        self.schedule().count()
    }
}

/// Reclassify errors from the first access to the file as open failures.
///
/// SQLite opens lazily, so an unreadable, read-only or non-database file is
/// only reported once `init` touches it.
fn open_failure(path: &Path, err: ThermoError) -> ThermoError {
    match err {
        ThermoError::Database(source)
            if matches!(
                source.sqlite_error_code(),
                Some(
                    rusqlite::ErrorCode::NotADatabase
                        | rusqlite::ErrorCode::ReadOnly
                        | rusqlite::ErrorCode::CannotOpen
                        | rusqlite::ErrorCode::PermissionDenied
                )
            ) =>
        {
            ThermoError::Open {
                path: PathBuf::from(path),
                source: Box::new(source),
            }
        }
        other => other,
    }
}

fn entry_from_row(row: StoredRow) -> ScheduleEntry {
    let mut values = row.values.into_iter().map(Option::unwrap_or_default);
    ScheduleEntry {
        id: row.id,
        day: values.next().unwrap_or_default(),
        hour: values.next().unwrap_or_default(),
        temperature: values.next().unwrap_or_default(),
    }
}
