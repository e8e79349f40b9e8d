//! Ledger commands run against a JSON state file.
//!
//! Each invocation loads the snapshot, performs one call, and writes the
//! snapshot back if the call changed state.

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use chequebank_bank::{BankSnapshot, CallContext, ChequeBank};
use chequebank_primitives::{ChequeId, Eip191Verifier, Height};
use clap::{Args, Subcommand};
use eyre::Result;
use tracing::info;

use super::{read_chain, read_cheque};
use crate::args::BankArgs;

/// Caller identity and ledger height for a call.
#[derive(Debug, Clone, Args)]
pub struct CallArgs {
    /// Authenticated caller.
    #[arg(long, value_name = "ADDRESS")]
    caller: Address,

    /// Current ledger height.
    #[arg(long, default_value_t = 0)]
    height: Height,
}

impl CallArgs {
    fn context(&self) -> CallContext {
        CallContext::new(self.caller, self.height)
    }
}

/// Ledger commands.
#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Credit the caller.
    Deposit {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long)]
        amount: U256,
    },

    /// Debit the caller and release funds to the caller.
    Withdraw {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long)]
        amount: U256,
    },

    /// Debit the caller and release funds to another recipient.
    WithdrawTo {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long)]
        amount: U256,
        #[arg(long, value_name = "ADDRESS")]
        to: Address,
    },

    /// Redeem a cheque as its payee.
    Redeem {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,
    },

    /// Revoke a cheque as its payer.
    Revoke {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,
    },

    /// Record the holder resolved by a sign-over chain.
    Notify {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,
        #[arg(long, value_name = "FILE")]
        chain: PathBuf,
    },

    /// Redeem a cheque through a sign-over chain as its final payee.
    RedeemSignOver {
        #[command(flatten)]
        call: CallArgs,
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,
        #[arg(long, value_name = "FILE")]
        chain: PathBuf,
    },

    /// Print an account balance.
    Balance {
        #[arg(long, value_name = "ADDRESS")]
        account: Address,
    },

    /// Print a cheque's status. Ids are scoped to the payer that issued them.
    Status {
        #[arg(long, value_name = "ADDRESS")]
        payer: Address,
        #[arg(long, value_name = "B256")]
        id: ChequeId,
    },

    /// Check whether a payee could redeem a cheque at a height.
    Valid {
        #[arg(long, value_name = "ADDRESS")]
        payee: Address,
        #[arg(long, default_value_t = 0)]
        height: Height,
        #[arg(long, value_name = "FILE")]
        cheque: PathBuf,
        #[arg(long, value_name = "FILE")]
        chain: Option<PathBuf>,
    },
}

impl LedgerCommand {
    pub fn run(self, args: &BankArgs) -> Result<()> {
        let path = args.state_file();
        let snapshot = BankSnapshot::load_or_new(&path, args.instance()?)?;
        let bank = ChequeBank::from_snapshot(snapshot, Eip191Verifier);

        let mutated = self.apply(&bank)?;
        if mutated {
            bank.snapshot().save(&path)?;
            info!(state = %path.display(), "state saved");
        }
        Ok(())
    }

    /// Run the call and print its result. Returns whether state changed.
    fn apply(self, bank: &ChequeBank) -> Result<bool> {
        match self {
            Self::Deposit { call, amount } => {
                let balance = bank.deposit(&call.context(), amount)?;
                println!("balance {balance}");
            }
            Self::Withdraw { call, amount } => {
                let release = bank.withdraw(&call.context(), amount)?;
                println!("released {} to {}", release.amount, release.recipient);
            }
            Self::WithdrawTo { call, amount, to } => {
                let release = bank.withdraw_to(&call.context(), amount, to)?;
                println!("released {} to {}", release.amount, release.recipient);
            }
            Self::Redeem { call, cheque } => {
                let cheque = read_cheque(&cheque)?;
                let r = bank.redeem(&call.context(), &cheque)?;
                println!("redeemed {}: {} from {} to {}", r.cheque_id, r.amount, r.payer, r.payee);
            }
            Self::Revoke { call, cheque } => {
                let cheque = read_cheque(&cheque)?;
                bank.revoke(&call.context(), &cheque)?;
                println!("revoked {}", cheque.id());
            }
            Self::Notify { call, cheque, chain } => {
                let cheque = read_cheque(&cheque)?;
                let chain = read_chain(Some(&chain))?;
                let resolved = bank.notify_sign_over(&call.context(), &cheque, &chain)?;
                println!(
                    "cheque {} now payable to {} (signed over by {})",
                    cheque.id(),
                    resolved.payee,
                    resolved.payer
                );
            }
            Self::RedeemSignOver { call, cheque, chain } => {
                let cheque = read_cheque(&cheque)?;
                let chain = read_chain(Some(&chain))?;
                let r = bank.redeem_sign_over(&call.context(), &cheque, &chain)?;
                println!("redeemed {}: {} from {} to {}", r.cheque_id, r.amount, r.payer, r.payee);
            }
            Self::Balance { account } => {
                println!("{}", bank.balance_of(&account));
                return Ok(false);
            }
            Self::Status { payer, id } => {
                println!("{}", serde_json::to_string_pretty(&bank.status_of(&payer, &id))?);
                return Ok(false);
            }
            Self::Valid {
                payee,
                height,
                cheque,
                chain,
            } => {
                let cheque = read_cheque(&cheque)?;
                let chain = read_chain(chain.as_deref())?;
                let ctx = CallContext::new(payee, height);
                match bank.validate(&ctx, &cheque, &chain) {
                    Ok(_) => println!("valid"),
                    Err(err) => println!("invalid: {err}"),
                }
                return Ok(false);
            }
        }
        Ok(true)
    }
}
