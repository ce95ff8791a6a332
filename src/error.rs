//! Error types for `thermostat_store`.
//!
//! Not-found lookups and conflict-ignored writes are not errors; they are
//! reported through `Option`/`bool` return values. Everything here is a
//! genuine failure the caller has to deal with.

use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ThermoError>;

#[derive(Debug, Error)]
pub enum ThermoError {
    /// The database file could not be opened or created.
    #[error("cannot open database at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid schema version {0}: must be between 1 and 2147483647")]
    InvalidSchemaVersion(i64),

    /// Stored schema differs and the version-change policy refuses to recreate.
    #[error("schema version mismatch: database has {found}, expected {expected}")]
    SchemaVersionMismatch { found: i64, expected: i64 },

    #[error("table {table} expects {expected} values, got {found}")]
    ColumnCount {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    OpenFailed,
    DatabaseError,
    InvalidSchemaVersion,
    SchemaVersionMismatch,
    ColumnCount,
    ConfigError,
    IoError,
    SerializationError,
}

impl ErrorCode {
    /// Process exit code for this error class.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::OpenFailed | Self::DatabaseError => 2,
            Self::InvalidSchemaVersion | Self::SchemaVersionMismatch => 3,
            Self::ColumnCount | Self::ConfigError => 4,
            Self::IoError | Self::SerializationError => 5,
        }
    }
}

impl ThermoError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } => ErrorCode::OpenFailed,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::InvalidSchemaVersion(_) => ErrorCode::InvalidSchemaVersion,
            Self::SchemaVersionMismatch { .. } => ErrorCode::SchemaVersionMismatch,
            Self::ColumnCount { .. } => ErrorCode::ColumnCount,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
        }
    }

    /// Busy/locked databases may succeed on a later attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }

    fn hint(&self) -> Option<String> {
        match self {
            Self::Open { path, .. } => Some(format!(
                "check that {} is writable and is a SQLite database",
                path.display()
            )),
            Self::SchemaVersionMismatch { .. } => Some(
                "pass --on-version-change recreate to drop and recreate the table".to_string(),
            ),
            Self::InvalidSchemaVersion(_) => {
                Some("use a --schema-version between 1 and 2147483647".to_string())
            }
            _ => None,
        }
    }
}

/// Error payload for JSON output.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct StructuredError {
    /// Machine-readable error code (SCREAMING_SNAKE_CASE)
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional hint for remediation
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
}

/// `{"error": {...}}` wrapper printed by `--json` commands on failure.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ErrorEnvelope {
    pub error: StructuredError,
}

impl From<&ThermoError> for ErrorEnvelope {
    fn from(err: &ThermoError) -> Self {
        Self {
            error: StructuredError::from(err),
        }
    }
}

impl From<&ThermoError> for StructuredError {
    fn from(err: &ThermoError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            hint: err.hint(),
            retryable: err.is_retryable(),
        }
    }
}
