//! Key management commands.

use alloy_signer_local::PrivateKeySigner;
use clap::Subcommand;
use eyre::Result;

use super::KeyArgs;

/// Key commands.
#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Generate a new random private key.
    New,

    /// Print the address of a private key.
    Address {
        #[command(flatten)]
        key: KeyArgs,
    },
}

impl KeyCommand {
    pub fn run(self) -> Result<()> {
        match self {
            Self::New => {
                let signer = PrivateKeySigner::random();
                println!("private key: {}", signer.to_bytes());
                println!("address:     {}", signer.address());
            }
            Self::Address { key } => {
                println!("{}", key.signer()?.address());
            }
        }
        Ok(())
    }
}
