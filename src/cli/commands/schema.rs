//! Schema command implementation.
//!
//! Emits JSON Schema documents describing thermo's machine-readable outputs,
//! so tooling can consume them without reading source code.

use crate::cli::commands::entries::{AddOutput, DeleteOutput, IdAtOutput, UpdateOutput};
use crate::cli::commands::print_json;
use crate::error::{ErrorEnvelope, Result};
use crate::model::{EntryFields, ScheduleEntry};
use chrono::{DateTime, Utc};
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct SchemaOutput {
    tool: &'static str,
    generated_at: DateTime<Utc>,
    schemas: BTreeMap<&'static str, RootSchema>,
}

/// Print every output schema as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn execute() -> Result<()> {
    let payload = SchemaOutput {
        tool: "thermo",
        generated_at: Utc::now(),
        schemas: build_schemas(),
    };
    print_json(&payload)
}

fn build_schemas() -> BTreeMap<&'static str, RootSchema> {
    let mut schemas = BTreeMap::new();
    schemas.insert("ScheduleEntry", schema_for!(ScheduleEntry));
    schemas.insert("ScheduleList", schema_for!(Vec<ScheduleEntry>));
    schemas.insert("EntryFields", schema_for!(EntryFields));
    schemas.insert("AddOutput", schema_for!(AddOutput));
    schemas.insert("UpdateOutput", schema_for!(UpdateOutput));
    schemas.insert("DeleteOutput", schema_for!(DeleteOutput));
    schemas.insert("IdAtOutput", schema_for!(IdAtOutput));
    schemas.insert("ErrorEnvelope", schema_for!(ErrorEnvelope));
    schemas
}
