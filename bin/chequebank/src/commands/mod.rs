//! Command implementations.

mod cheque;
mod key;
mod ledger;

pub use cheque::ChequeCommand;
pub use key::KeyCommand;
pub use ledger::LedgerCommand;

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_signer_local::PrivateKeySigner;
use chequebank_primitives::{SignOverChain, SignedCheque, SignedSignOver};
use clap::Args;
use eyre::{Result, WrapErr};

/// Signing key argument.
#[derive(Debug, Clone, Args)]
pub struct KeyArgs {
    /// Hex-encoded secp256k1 private key.
    #[arg(long, env = "CHEQUEBANK_KEY", hide_env_values = true, value_name = "HEX")]
    key: String,
}

impl KeyArgs {
    /// Parse the private key.
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        PrivateKeySigner::from_str(self.key.trim()).wrap_err("invalid private key")
    }
}

/// Read a signed cheque from a JSON file.
pub fn read_cheque(path: &Path) -> Result<SignedCheque> {
    let data =
        fs::read(path).wrap_err_with(|| format!("failed to read cheque: {}", path.display()))?;
    SignedCheque::from_json(&data)
        .wrap_err_with(|| format!("failed to parse cheque: {}", path.display()))
}

/// Read a sign-over chain from a JSON file, or an empty chain if `path` is unset.
pub fn read_chain(path: Option<&Path>) -> Result<SignOverChain> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let data =
        fs::read(path).wrap_err_with(|| format!("failed to read chain: {}", path.display()))?;
    SignedSignOver::chain_from_json(&data)
        .wrap_err_with(|| format!("failed to parse chain: {}", path.display()))
}

/// Write `data` to `out`, or stdout when unset.
pub fn write_output(out: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match out {
        Some(path) => fs::write(path, data)
            .wrap_err_with(|| format!("failed to write {}", path.display())),
        None => {
            println!("{}", String::from_utf8_lossy(data));
            Ok(())
        }
    }
}
