//! Top-level command-line parser.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;

use crate::{
    args::{BankArgs, LogArgs},
    commands::{ChequeCommand, KeyCommand, LedgerCommand},
    config::Config,
};

/// Chequebank - offline cheques settled against a custodial ledger
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logging configuration.
    #[command(flatten)]
    pub logs: LogArgs,

    /// Ledger configuration.
    #[command(flatten)]
    pub bank: BankArgs,

    /// TOML config file; command-line values take precedence.
    #[arg(long, global = true, value_name = "FILE", env = "CHEQUEBANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Merge the config file, if any, under the command-line values.
    pub fn resolve(mut self) -> Result<Self> {
        if let Some(path) = &self.config {
            let file = Config::load(path)?;
            self.bank.merge(&file.bank);
            self.logs.merge(&file.log);
        }
        Ok(self)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate and inspect signing keys.
    #[command(subcommand)]
    Key(KeyCommand),

    /// Sign, sign over and verify cheques.
    #[command(subcommand)]
    Cheque(ChequeCommand),

    /// Run ledger operations against the state file.
    #[command(subcommand)]
    Ledger(LedgerCommand),
}
