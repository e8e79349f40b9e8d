//! Signature and artifact errors.

use alloy_primitives::Address;

/// Errors that can occur while signing, parsing or authenticating artifacts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Signature bytes could not be parsed or recovered.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature recovered to an unexpected address.
    #[error("invalid signer: expected {expected}, got {actual}")]
    WrongSigner { expected: Address, actual: Address },

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// JSON serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
