//! Chequebank command-line tool.

mod args;
mod cli;
mod commands;
mod config;
mod logging;

use clap::Parser;
use color_eyre::eyre;
use tracing::debug;

use crate::cli::{Cli, Commands};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse().resolve()?;
    logging::init_logging(&cli.logs)?;
    debug!(instance = ?cli.bank.instance, state = ?cli.bank.state, "configuration resolved");

    match cli.command {
        Commands::Key(cmd) => cmd.run(),
        Commands::Cheque(cmd) => cmd.run(&cli.bank),
        Commands::Ledger(cmd) => cmd.run(&cli.bank),
    }
}
