//! Schedule entry commands: add, list, update, delete, id-at.

use crate::cli::{Commands, DeleteArgs, EntryArgs, IdAtArgs, UpdateArgs};
use crate::cli::commands::print_json;
use crate::error::Result;
use crate::model::{EntryFields, ScheduleEntry};
use crate::storage::{NOT_FOUND_ID, ScheduleStore};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Serialize, JsonSchema)]
pub struct AddOutput {
    /// Assigned id; null when the insert was ignored on conflict
    pub id: Option<i64>,
    pub ignored: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct UpdateOutput {
    pub id: i64,
    /// False when no entry had this id
    pub updated: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct DeleteOutput {
    pub id: i64,
    /// False when no entry had this id
    pub deleted: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct IdAtOutput {
    pub position: usize,
    /// Entry id, or -1 when the position is out of range
    pub id: i64,
}

/// Execute a store-backed command.
///
/// # Errors
///
/// Returns an error if the store operation or output serialization fails.
pub fn execute(command: &Commands, store: &ScheduleStore, json: bool) -> Result<()> {
    match command {
        Commands::Add(args) => add(args, store, json),
        Commands::List => list(store, json),
        Commands::Update(args) => update(args, store, json),
        Commands::Delete(args) => delete(args, store, json),
        Commands::IdAt(args) => id_at(args, store, json),
        Commands::Schema | Commands::Completions(_) => Ok(()),
    }
}

fn fields(args: &EntryArgs) -> EntryFields {
    EntryFields::new(&args.day, &args.hour, &args.temperature)
}

fn add(args: &EntryArgs, store: &ScheduleStore, json: bool) -> Result<()> {
    let id = store.add(&fields(args))?;

    if json {
        return print_json(&AddOutput {
            id,
            ignored: id.is_none(),
        });
    }

    match id {
        Some(id) => println!("Added entry {id}"),
        None => println!("Entry ignored (conflict)"),
    }
    Ok(())
}

fn list(store: &ScheduleStore, json: bool) -> Result<()> {
    let entries = store.get_all()?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No schedule entries.");
        return Ok(());
    }

    print!("{}", render_table(&entries));
    Ok(())
}

fn update(args: &UpdateArgs, store: &ScheduleStore, json: bool) -> Result<()> {
    let updated = store.update(args.id, &fields(&args.entry))?;

    if json {
        return print_json(&UpdateOutput {
            id: args.id,
            updated,
        });
    }

    if updated {
        println!("Updated entry {}", args.id);
    } else {
        println!("No entry {}", args.id);
    }
    Ok(())
}

fn delete(args: &DeleteArgs, store: &ScheduleStore, json: bool) -> Result<()> {
    let deleted = store.delete(args.id)?;

    if json {
        return print_json(&DeleteOutput {
            id: args.id,
            deleted,
        });
    }

    if deleted {
        println!("Deleted entry {}", args.id);
    } else {
        println!("No entry {}", args.id);
    }
    Ok(())
}

fn id_at(args: &IdAtArgs, store: &ScheduleStore, json: bool) -> Result<()> {
    let id = store
        .id_at_position(args.position)?
        .unwrap_or(NOT_FOUND_ID);

    if json {
        return print_json(&IdAtOutput {
            position: args.position,
            id,
        });
    }

    println!("{id}");
    Ok(())
}

fn render_table(entries: &[ScheduleEntry]) -> String {
    let id_width = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let day_width = entries
        .iter()
        .map(|e| e.day.chars().count())
        .max()
        .unwrap_or(0)
        .max("DAY".len());
    let hour_width = entries
        .iter()
        .map(|e| e.hour.chars().count())
        .max()
        .unwrap_or(0)
        .max("HOUR".len());

    let mut out = format!(
        "{:>id_width$}  {:<day_width$}  {:<hour_width$}  TEMPERATURE\n",
        "ID", "DAY", "HOUR"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:>id_width$}  {:<day_width$}  {:<hour_width$}  {}\n",
            entry.id, entry.day, entry.hour, entry.temperature
        ));
    }
    out
}
