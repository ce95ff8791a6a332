//! Command-line interface for the `thermo` binary.

pub mod commands;

use crate::config::CliOverrides;
use crate::storage::{ConflictPolicy, VersionChangePolicy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "thermo", version, about = "Thermostat schedule store")]
pub struct Cli {
    /// Database path (overrides config and THERMO_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (default: ./thermo.yaml or THERMO_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Schema version to open the database with
    #[arg(long, global = true)]
    pub schema_version: Option<i64>,

    /// What to do when the stored schema version differs
    #[arg(long, global = true, value_enum)]
    pub on_version_change: Option<VersionChangeArg>,

    /// How inserts and updates treat constraint violations
    #[arg(long, global = true, value_enum)]
    pub conflict: Option<ConflictArg>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            db: self.db.clone(),
            config: self.config.clone(),
            schema_version: self.schema_version,
            on_version_change: self.on_version_change.map(Into::into),
            conflict: self.conflict.map(Into::into),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a schedule entry
    Add(EntryArgs),
    /// List all schedule entries
    List,
    /// Replace the fields of an entry
    Update(UpdateArgs),
    /// Delete an entry by id
    Delete(DeleteArgs),
    /// Print the id of the entry at a 0-based position (-1 if none)
    IdAt(IdAtArgs),
    /// Print JSON Schemas for machine-readable output
    Schema,
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EntryArgs {
    pub day: String,
    pub hour: String,
    pub temperature: String,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    pub id: i64,
    #[command(flatten)]
    pub entry: EntryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct IdAtArgs {
    pub position: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeArg {
    Recreate,
    Refuse,
}

impl From<VersionChangeArg> for VersionChangePolicy {
    fn from(arg: VersionChangeArg) -> Self {
        match arg {
            VersionChangeArg::Recreate => Self::Recreate,
            VersionChangeArg::Refuse => Self::Refuse,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictArg {
    Ignore,
    Abort,
}

impl From<ConflictArg> for ConflictPolicy {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Ignore => Self::Ignore,
            ConflictArg::Abort => Self::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_parses_id_then_fields() {
        let cli = Cli::try_parse_from(["thermo", "update", "4", "Fri", "18:00", "20"]).unwrap();
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.id, 4);
                assert_eq!(args.entry.day, "Fri");
                assert_eq!(args.entry.temperature, "20");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "thermo",
            "list",
            "--db",
            "/tmp/t.db",
            "--schema-version",
            "2",
            "--on-version-change",
            "refuse",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.db, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(overrides.schema_version, Some(2));
        assert_eq!(
            overrides.on_version_change,
            Some(VersionChangePolicy::Refuse)
        );
        assert_eq!(overrides.conflict, None);
    }
}
