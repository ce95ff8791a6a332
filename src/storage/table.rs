//! Generic CRUD over a table described by a [`TableDescriptor`].

use crate::error::{Result, ThermoError};
use crate::storage::schema::TableDescriptor;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// How inserts and updates treat constraint violations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Drop the offending write silently (`INSERT OR IGNORE`, `UPDATE OR IGNORE`).
    #[default]
    Ignore,
    /// Surface the violation as an error.
    Abort,
}

impl ConflictPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Abort => "abort",
        }
    }

    const fn insert_verb(self) -> &'static str {
        match self {
            Self::Ignore => "INSERT OR IGNORE",
            Self::Abort => "INSERT",
        }
    }

    const fn update_verb(self) -> &'static str {
        match self {
            Self::Ignore => "UPDATE OR IGNORE",
            Self::Abort => "UPDATE",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "abort" | "error" => Ok(Self::Abort),
            other => Err(ThermoError::Config(format!(
                "unknown conflict policy: {other}"
            ))),
        }
    }
}

/// A row as stored: key first, then values in descriptor column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: i64,
    pub values: Vec<Option<String>>,
}

/// Borrowed view of one table on a connection.
pub struct Table<'c> {
    conn: &'c Connection,
    desc: &'static TableDescriptor,
    conflict: ConflictPolicy,
}

impl<'c> Table<'c> {
    #[must_use]
    pub const fn new(
        conn: &'c Connection,
        desc: &'static TableDescriptor,
        conflict: ConflictPolicy,
    ) -> Self {
        Self {
            conn,
            desc,
            conflict,
        }
    }

    fn check_arity(&self, values: &[&str]) -> Result<()> {
        if values.len() == self.desc.columns.len() {
            Ok(())
        } else {
            Err(ThermoError::ColumnCount {
                table: self.desc.name,
                expected: self.desc.columns.len(),
                found: values.len(),
            })
        }
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT {}, {} FROM {} ORDER BY {}",
            self.desc.key,
            self.desc.column_list(),
            self.desc.name,
            self.desc.key
        )
    }

    fn map_row(&self, row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
        let id = row.get(0)?;
        let values = (1..=self.desc.columns.len())
            .map(|idx| row.get::<_, Option<String>>(idx))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(StoredRow { id, values })
    }

    /// Insert a row and return its assigned id.
    ///
    /// Returns `None` when the conflict policy dropped the insert.
    ///
    /// # Errors
    ///
    /// Returns an error on wrong arity or if the insert fails.
    pub fn insert(&self, values: &[&str]) -> Result<Option<i64>> {
        self.check_arity(values)?;
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "{} INTO {} ({}) VALUES ({})",
            self.conflict.insert_verb(),
            self.desc.name,
            self.desc.column_list(),
            placeholders
        );

        let changed = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            debug!(table = self.desc.name, "insert ignored on conflict");
            return Ok(None);
        }

        let id = self.conn.last_insert_rowid();
        debug!(table = self.desc.name, id, "inserted row");
        Ok(Some(id))
    }

    /// All rows in key order, materialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn rows(&self) -> Result<Vec<StoredRow>> {
        let mut stmt = self.conn.prepare(&self.select_sql())?;
        let rows = stmt
            .query_map([], |row| self.map_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        trace!(table = self.desc.name, count = rows.len(), "scanned table");
        Ok(rows)
    }

    /// Row with the given key, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<StoredRow>> {
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} = ?",
            self.desc.key,
            self.desc.column_list(),
            self.desc.name,
            self.desc.key
        );
        let row = self
            .conn
            .query_row(&sql, [id], |row| self.map_row(row))
            .optional()?;
        Ok(row)
    }

    /// Key of the row at 0-based `position` within a full scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn id_at(&self, position: usize) -> Result<Option<i64>> {
        let Ok(offset) = i64::try_from(position) else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {} LIMIT 1 OFFSET ?",
            self.desc.key, self.desc.name, self.desc.key
        );
        let id = self
            .conn
            .query_row(&sql, [offset], |row| row.get(0))
            .optional()?;
        if id.is_none() {
            debug!(table = self.desc.name, position, "no row at position");
        }
        Ok(id)
    }

    /// Delete by key. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", self.desc.name, self.desc.key);
        let changed = self.conn.execute(&sql, [id])?;
        debug!(table = self.desc.name, id, changed, "delete");
        Ok(changed > 0)
    }

    /// Replace every value column of the row with key `id`.
    ///
    /// Returns `false` when no row matched or the conflict policy dropped the
    /// update.
    ///
    /// # Errors
    ///
    /// Returns an error on wrong arity or if the update fails.
    pub fn update(&self, id: i64, values: &[&str]) -> Result<bool> {
        self.check_arity(values)?;
        let assignments = self
            .desc
            .columns
            .iter()
            .map(|c| format!("{} = ?", c.name))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "{} {} SET {} WHERE {} = ?",
            self.conflict.update_verb(),
            self.desc.name,
            assignments,
            self.desc.key
        );

        let params = values
            .iter()
            .map(|v| Value::Text((*v).to_string()))
            .chain(std::iter::once(Value::Integer(id)));
        let changed = self.conn.execute(&sql, params_from_iter(params))?;
        debug!(table = self.desc.name, id, changed, "update");
        Ok(changed > 0)
    }

    /// Number of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.desc.name);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
