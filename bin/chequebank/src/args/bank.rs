//! Bank CLI arguments.

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::Args;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};

/// State file used when none is configured.
pub const DEFAULT_STATE_FILE: &str = "chequebank-state.json";

/// Ledger instance and state file.
#[derive(Debug, Args, Clone, Default, Serialize, Deserialize)]
#[command(next_help_heading = "Bank")]
#[serde(default)]
pub struct BankArgs {
    /// Ledger instance address cheques are bound to.
    #[arg(long = "bank.instance", global = true, value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<Address>,

    /// JSON file holding balances and cheque statuses.
    #[arg(long = "bank.state", global = true, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PathBuf>,
}

impl BankArgs {
    /// Fill unset values from a config file section.
    pub fn merge(&mut self, file: &BankArgs) {
        if self.instance.is_none() {
            self.instance = file.instance;
        }
        if self.state.is_none() {
            self.state.clone_from(&file.state);
        }
    }

    /// Configured instance address.
    pub fn instance(&self) -> Result<Address> {
        self.instance.ok_or_else(|| {
            eyre!("no ledger instance: pass --bank.instance or set bank.instance in the config file")
        })
    }

    /// Configured state file, or [`DEFAULT_STATE_FILE`].
    pub fn state_file(&self) -> PathBuf {
        self.state
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file() {
        let mut args = BankArgs {
            instance: Some(Address::repeat_byte(1)),
            state: None,
        };
        let file = BankArgs {
            instance: Some(Address::repeat_byte(2)),
            state: Some(PathBuf::from("/var/lib/bank.json")),
        };
        args.merge(&file);

        assert_eq!(args.instance().unwrap(), Address::repeat_byte(1));
        assert_eq!(args.state_file(), PathBuf::from("/var/lib/bank.json"));
    }

    #[test]
    fn test_defaults() {
        let args = BankArgs::default();
        assert!(args.instance().is_err());
        assert_eq!(args.state_file(), PathBuf::from(DEFAULT_STATE_FILE));
    }
}
