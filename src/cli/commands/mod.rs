//! Command implementations for `thermo`.

pub mod completions;
pub mod entries;
pub mod schema;

use crate::cli::{Cli, Commands};
use crate::config;
use crate::error::Result;
use serde::Serialize;

/// Run the parsed command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the command fails.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let json = cli.json;
    match &cli.command {
        Commands::Schema => schema::execute(),
        Commands::Completions(args) => {
            completions::execute(args);
            Ok(())
        }
        command => {
            let store = config::open_store(&cli.overrides())?;
            let result = entries::execute(command, &store, json);
            let closed = store.close();
            result.and(closed)
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}
