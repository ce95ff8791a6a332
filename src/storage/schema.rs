//! Table descriptors and schema lifecycle.
//!
//! The schema version lives in SQLite's `user_version` pragma. A fresh
//! database reports version 0 and gets its table created; any other
//! difference from the requested version is handled by the
//! [`VersionChangePolicy`].

use crate::error::{Result, ThermoError};
use rusqlite::Connection;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Schema version written by this release.
pub const DEFAULT_SCHEMA_VERSION: i64 = 3;

/// `user_version` is a 32-bit signed integer; larger values read back as 0.
pub const MAX_SCHEMA_VERSION: i64 = i32::MAX as i64;

/// One non-key column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub decl: &'static str,
}

/// Name, key column and ordered value columns of a table.
///
/// Identifiers are interpolated into SQL, so descriptors are `'static`
/// constants and never built from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: &'static str,
    pub key: &'static str,
    pub columns: &'static [ColumnDef],
}

/// The thermostat schedule table.
pub const SCHEDULE_TABLE: TableDescriptor = TableDescriptor {
    name: "thermostat",
    key: "id",
    columns: &[
        ColumnDef {
            name: "day",
            decl: "TEXT",
        },
        ColumnDef {
            name: "hour",
            decl: "TEXT",
        },
        ColumnDef {
            name: "temperature",
            decl: "TEXT",
        },
    ],
};

impl TableDescriptor {
    /// `CREATE TABLE` statement for this descriptor.
    #[must_use]
    pub fn create_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY AUTOINCREMENT",
            self.name, self.key
        );
        for column in self.columns {
            sql.push_str(", ");
            sql.push_str(column.name);
            if !column.decl.is_empty() {
                sql.push(' ');
                sql.push_str(column.decl);
            }
        }
        sql.push(')');
        sql
    }

    /// Comma-separated value column names, in order.
    #[must_use]
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// What to do when the stored schema version differs from the requested one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionChangePolicy {
    /// Drop the table and recreate it empty. Upgrades and downgrades alike.
    #[default]
    Recreate,
    /// Fail the open and leave the stored data alone.
    Refuse,
}

impl VersionChangePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recreate => "recreate",
            Self::Refuse => "refuse",
        }
    }
}

impl fmt::Display for VersionChangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionChangePolicy {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "recreate" | "drop" => Ok(Self::Recreate),
            "refuse" | "error" => Ok(Self::Refuse),
            other => Err(ThermoError::Config(format!(
                "unknown version change policy: {other}"
            ))),
        }
    }
}

/// Create the table described by `table`.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn on_create(conn: &Connection, table: &TableDescriptor) -> rusqlite::Result<()> {
    info!(table = table.name, "creating table");
    conn.execute_batch(&table.create_sql())
}

/// Drop and recreate the table. All rows are discarded.
///
/// # Errors
///
/// Returns an error if the DDL fails.
pub fn on_version_change(
    conn: &Connection,
    table: &TableDescriptor,
    old_version: i64,
    new_version: i64,
) -> rusqlite::Result<()> {
    info!(
        table = table.name,
        old_version, new_version, "schema version changed, recreating table"
    );
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", table.name))?;
    on_create(conn, table)
}

/// Read the stored schema version (0 for a fresh database).
///
/// # Errors
///
/// Returns an error if the pragma cannot be read.
pub fn stored_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Bring `table` to `version`, applying `policy` on mismatch.
///
/// # Errors
///
/// Returns an error if `version` is outside `1..=MAX_SCHEMA_VERSION`, if the policy refuses a
/// mismatch, or if any SQL fails. The table is left untouched on error.
pub fn apply_schema(
    conn: &mut Connection,
    table: &TableDescriptor,
    version: i64,
    policy: VersionChangePolicy,
) -> Result<()> {
    if !(1..=MAX_SCHEMA_VERSION).contains(&version) {
        return Err(ThermoError::InvalidSchemaVersion(version));
    }

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    let tx = conn.transaction()?;
    let found = stored_version(&tx)?;

    if found == 0 {
        on_create(&tx, table)?;
    } else if found != version {
        match policy {
            VersionChangePolicy::Recreate => on_version_change(&tx, table, found, version)?,
            VersionChangePolicy::Refuse => {
                return Err(ThermoError::SchemaVersionMismatch {
                    found,
                    expected: version,
                });
            }
        }
    }

    tx.pragma_update(None, "user_version", version)?;
    tx.commit()?;
    Ok(())
}
