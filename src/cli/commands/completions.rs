//! Shell completion generation.

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use std::io;

pub fn execute(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut io::stdout());
}
