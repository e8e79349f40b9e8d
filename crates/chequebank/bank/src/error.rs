//! Protocol error types.

use alloy_primitives::Address;
use chequebank_ledger::{LedgerError, RegistryError};
use chequebank_primitives::{ChequeId, Height, VerifyError};

/// Flat taxonomy of call rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidSignature,
    InsufficientBalance,
    BalanceOverflow,
    AlreadyRedeemed,
    Revoked,
    NotYetActive,
    Expired,
    SignedOver,
    ChainTooLong,
    ChainBroken,
    WrongPayee,
    WrongPayer,
    MalformedCheque,
}

/// Why a sign-over chain does not link up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainFault {
    /// No links were supplied.
    #[error("chain is empty")]
    Empty,

    /// Link counter is out of sequence.
    #[error("expected counter {expected}, found {found}")]
    Counter { expected: usize, found: u8 },

    /// Link refers to another cheque.
    #[error("link is for cheque {found}")]
    ChequeId { found: ChequeId },

    /// Link is not signed by the current holder.
    #[error("expected old payee {expected}, found {found}")]
    OldPayee { expected: Address, found: Address },

    /// Chain does not pass through the last notified holder.
    #[error("chain does not extend the notified sign-over to {latest_payee}")]
    Diverged { latest_payee: Address },
}

/// Errors returned by [`ChequeBank`](crate::ChequeBank) calls.
///
/// Every error rejects the whole call; no state is changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    /// A cheque or link signature is malformed or from the wrong signer.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] VerifyError),

    /// Balance operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Cheque status does not allow the transition.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Ledger height is below the cheque's validity window.
    #[error("cheque {id} is not active until height {valid_from} (current {height})")]
    NotYetActive {
        id: ChequeId,
        valid_from: u32,
        height: Height,
    },

    /// Ledger height is past the cheque's validity window.
    #[error("cheque {id} expired at height {valid_thru} (current {height})")]
    Expired {
        id: ChequeId,
        valid_thru: u32,
        height: Height,
    },

    /// Cheque was signed over; redemption must present the chain.
    #[error("cheque {id} has been signed over to {latest_payee}")]
    SignedOver { id: ChequeId, latest_payee: Address },

    /// Sign-over chain exceeds the depth limit.
    #[error("sign-over chain of {len} links exceeds limit of {max}")]
    ChainTooLong { len: usize, max: usize },

    /// Sign-over chain does not link up.
    #[error("sign-over chain broken at link {index}: {fault}")]
    ChainBroken { index: usize, fault: ChainFault },

    /// Caller is not the payee entitled to the cheque.
    #[error("wrong payee: expected {expected}, caller {caller}")]
    WrongPayee { expected: Address, caller: Address },

    /// Caller is not the cheque's payer.
    #[error("wrong payer: expected {expected}, caller {caller}")]
    WrongPayer { expected: Address, caller: Address },

    /// Cheque has a zero amount or an inverted validity window.
    #[error("malformed cheque {id}: {reason}")]
    MalformedCheque { id: ChequeId, reason: &'static str },
}

impl BankError {
    /// The rejection kind, independent of the values involved.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignature(_) => ErrorKind::InvalidSignature,
            Self::Ledger(LedgerError::InsufficientBalance { .. }) => ErrorKind::InsufficientBalance,
            Self::Ledger(LedgerError::BalanceOverflow { .. }) => ErrorKind::BalanceOverflow,
            Self::Registry(RegistryError::AlreadyRedeemed(_)) => ErrorKind::AlreadyRedeemed,
            Self::Registry(RegistryError::Revoked(_)) => ErrorKind::Revoked,
            Self::NotYetActive { .. } => ErrorKind::NotYetActive,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::SignedOver { .. } => ErrorKind::SignedOver,
            Self::ChainTooLong { .. } => ErrorKind::ChainTooLong,
            Self::ChainBroken { .. } => ErrorKind::ChainBroken,
            Self::WrongPayee { .. } => ErrorKind::WrongPayee,
            Self::WrongPayer { .. } => ErrorKind::WrongPayer,
            Self::MalformedCheque { .. } => ErrorKind::MalformedCheque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256};

    #[test]
    fn test_kind_mapping() {
        let err = BankError::from(LedgerError::InsufficientBalance {
            account: Address::ZERO,
            balance: U256::from(1u64),
            requested: U256::from(2u64),
        });
        assert_eq!(err.kind(), ErrorKind::InsufficientBalance);

        let err = BankError::from(RegistryError::AlreadyRedeemed(B256::ZERO));
        assert_eq!(err.kind(), ErrorKind::AlreadyRedeemed);

        let err = BankError::from(VerifyError::InvalidSignature("short".into()));
        assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::ChainTooLong.to_string(), "chain_too_long");
        let name: &'static str = ErrorKind::NotYetActive.into();
        assert_eq!(name, "not_yet_active");
    }

    #[test]
    fn test_chain_broken_message() {
        let err = BankError::ChainBroken {
            index: 1,
            fault: ChainFault::Counter {
                expected: 2,
                found: 3,
            },
        };
        assert_eq!(
            err.to_string(),
            "sign-over chain broken at link 1: expected counter 2, found 3"
        );
    }
}
