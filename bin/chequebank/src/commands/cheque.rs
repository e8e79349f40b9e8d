//! Off-ledger cheque commands: signing, signing over and verification.

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use chequebank_bank::validate_chain;
use chequebank_primitives::{
    Cheque, ChequeId, Eip191Verifier, MAX_SIGN_OVER_DEPTH, SignOver, SignedSignOver,
};
use clap::Subcommand;
use eyre::{Result, bail, ensure};
use tracing::info;

use super::{KeyArgs, read_chain, read_cheque, write_output};
use crate::args::BankArgs;

/// Cheque commands.
#[derive(Debug, Subcommand)]
pub enum ChequeCommand {
    /// Sign a new cheque as its payer.
    Sign {
        #[command(flatten)]
        key: KeyArgs,

        /// Unique 32-byte cheque id.
        #[arg(long, value_name = "B256")]
        id: ChequeId,

        /// Account entitled to redeem.
        #[arg(long, value_name = "ADDRESS")]
        payee: Address,

        /// Amount to pay.
        #[arg(long)]
        amount: U256,

        /// First ledger height at which the cheque is redeemable.
        #[arg(long, default_value_t = 0)]
        valid_from: u32,

        /// Last ledger height at which the cheque is redeemable.
        #[arg(long, default_value_t = u32::MAX)]
        valid_thru: u32,

        /// Output file; stdout if omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Sign a cheque over to a new payee as its current holder.
    ///
    /// Appends one link to the existing chain (or starts one).
    SignOver {
        #[command(flatten)]
        key: KeyArgs,

        /// Signed cheque JSON.
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,

        /// Existing sign-over chain JSON.
        #[arg(long, value_name = "FILE")]
        chain: Option<PathBuf>,

        /// New payee.
        #[arg(long, value_name = "ADDRESS")]
        to: Address,

        /// Output file for the extended chain; stdout if omitted.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Check a cheque's signature and resolve its sign-over chain.
    Verify {
        /// Signed cheque JSON.
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,

        /// Sign-over chain JSON.
        #[arg(long, value_name = "FILE")]
        chain: Option<PathBuf>,
    },
}

impl ChequeCommand {
    pub fn run(self, bank: &BankArgs) -> Result<()> {
        match self {
            Self::Sign {
                key,
                id,
                payee,
                amount,
                valid_from,
                valid_thru,
                out,
            } => {
                let signer = key.signer()?;
                let cheque = Cheque::new(id, signer.address(), payee, amount, valid_from, valid_thru);
                ensure!(
                    cheque.is_well_formed(),
                    "cheque needs a non-zero amount and valid_from <= valid_thru"
                );

                let signed = cheque.sign(&signer, bank.instance()?)?;
                info!(%id, payer = %signer.address(), %payee, %amount, "cheque signed");
                write_output(out.as_ref(), &signed.to_json()?)
            }
            Self::SignOver {
                key,
                cheque,
                chain,
                to,
                out,
            } => {
                let signer = key.signer()?;
                let cheque = read_cheque(&cheque)?;
                let mut chain = read_chain(chain.as_deref())?;
                ensure!(
                    chain.len() < MAX_SIGN_OVER_DEPTH,
                    "chain already has the maximum of {MAX_SIGN_OVER_DEPTH} links"
                );

                let holder = chain
                    .last()
                    .map_or(cheque.cheque.payee, |link| link.sign_over.new_payee);
                if holder != signer.address() {
                    bail!("cheque is held by {holder}, not by key {}", signer.address());
                }

                let counter = u8::try_from(chain.len() + 1)?;
                let link = SignOver::new(counter, cheque.id(), holder, to).sign(&signer)?;
                chain.push(link);
                info!(id = %cheque.id(), from = %holder, %to, counter, "cheque signed over");

                write_output(out.as_ref(), &SignedSignOver::chain_to_json(&chain)?)
            }
            Self::Verify { cheque, chain } => {
                let cheque = read_cheque(&cheque)?;
                let chain = read_chain(chain.as_deref())?;
                let verifier = Eip191Verifier;

                cheque.verify(&verifier, bank.instance()?)?;
                println!("cheque {} signed by payer {}", cheque.id(), cheque.cheque.payer);

                if !chain.is_empty() {
                    let resolved = validate_chain(&verifier, &cheque.cheque, &chain)?;
                    println!(
                        "chain of {} links resolves to payee {} (from {})",
                        resolved.depth, resolved.payee, resolved.payer
                    );
                }
                Ok(())
            }
        }
    }
}
