//! Cheque types, digests and signing for the cheque bank.
//!
//! This crate provides the off-ledger artifacts exchanged between account
//! holders, and the primitives the ledger uses to authenticate them:
//!
//! - [`Cheque`] / [`SignedCheque`] - A payer's signed promise to pay a payee
//! - [`SignOver`] / [`SignedSignOver`] - A payee handing redemption rights on
//! - [`SignatureVerifier`] - Recovers the signer of a digest
//!
//! # Digests
//!
//! Both artifacts are hashed with keccak256 over their Solidity
//! `abi.encodePacked` encoding, and signed as EIP-191 personal messages:
//!
//! ```text
//! cheque:    bytes32 id | address payer | address payee | uint256 amount
//!            | address instance | uint32 validFrom | uint32 validThru
//! sign-over: bytes4 0xFFFFDEAD | uint8 counter | bytes32 id
//!            | address oldPayee | address newPayee
//! ```
//!
//! # Signing a Cheque
//!
//! ```ignore
//! let cheque = Cheque::new(id, payer, payee, amount, valid_from, valid_thru);
//! let signed = cheque.sign(&signer, instance)?;
//! let json = signed.to_json()?;
//! ```

pub mod cheque;
pub mod constants;
mod error;
pub mod sign_over;
pub mod verifier;

pub use cheque::{Cheque, SignedCheque};
pub use constants::{MAX_SIGN_OVER_DEPTH, SIGNATURE_LENGTH, SIGN_OVER_MAGIC};
pub use error::VerifyError;
pub use sign_over::{SignOver, SignOverChain, SignedSignOver};
pub use verifier::{Eip191Verifier, SignatureVerifier};

// Re-export commonly used types
pub use alloy_primitives::{Address, B256, Bytes, U256};

/// Unique 32-byte cheque identifier, chosen by the payer.
pub type ChequeId = B256;

/// Ledger height used as the logical clock for validity windows.
pub type Height = u64;
