//! Ledger and registry error types.

use alloy_primitives::{Address, U256};
use chequebank_primitives::ChequeId;

/// Errors that can occur during balance operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Debit exceeds the account balance.
    #[error("account {account} balance {balance} is less than {requested}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        requested: U256,
    },

    /// Credit would overflow the account balance.
    #[error("account {account} balance would overflow")]
    BalanceOverflow { account: Address },
}

/// Errors that can occur during cheque status transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Cheque has already been redeemed.
    #[error("cheque {0} has been redeemed")]
    AlreadyRedeemed(ChequeId),

    /// Cheque has been revoked.
    #[error("cheque {0} has been revoked")]
    Revoked(ChequeId),
}
