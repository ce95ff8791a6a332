use clap::Parser;
use std::process::ExitCode;
use thermostat_store::cli::{Cli, commands};
use thermostat_store::error::ErrorEnvelope;
use thermostat_store::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Error: failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match commands::dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            if cli.json {
                match serde_json::to_string_pretty(&ErrorEnvelope::from(&err)) {
                    Ok(json) => println!("{json}"),
                    Err(_) => eprintln!("Error: {err}"),
                }
            } else {
                eprintln!("Error: {err}");
            }
            let code = u8::try_from(err.code().exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
