//! TOML configuration file.
//!
//! ```toml
//! [bank]
//! instance = "0x00000000000000000000000000000000000000c0"
//! state = "/var/lib/chequebank/state.json"
//!
//! [log]
//! filter = "chequebank_bank=debug"
//! json = false
//! ```
//!
//! Values given on the command line take precedence over the file.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::args::{BankArgs, LogArgs};

/// Contents of a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger instance and state file.
    pub bank: BankArgs,
    /// Logging.
    pub log: LogArgs,
}

impl Config {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))
    }
}
