//! Signature recovery.
//!
//! The ledger never holds keys; it only needs to learn which address produced
//! a signature over a digest. [`SignatureVerifier`] abstracts that primitive so
//! the protocol logic is independent of the curve and message scheme.

use alloy_primitives::{Address, B256, Signature};
use auto_impl::auto_impl;

use crate::{SIGNATURE_LENGTH, VerifyError};

/// Recovers the address that signed a digest.
///
/// Implementations are stateless. Recovery never fails because the signer is
/// "wrong"; comparing against an expected address is the caller's job (see
/// [`verify`](Self::verify)).
#[auto_impl(&, Arc, Box)]
pub trait SignatureVerifier: Send + Sync {
    /// Recover the signer of `digest`.
    ///
    /// Returns [`VerifyError::InvalidSignature`] if the signature is malformed.
    fn recover_signer(&self, digest: B256, signature: &[u8]) -> Result<Address, VerifyError>;

    /// Recover the signer of `digest` and require it to be `expected`.
    fn verify(&self, digest: B256, signature: &[u8], expected: Address) -> Result<(), VerifyError> {
        let actual = self.recover_signer(digest, signature)?;
        if actual != expected {
            return Err(VerifyError::WrongSigner { expected, actual });
        }
        Ok(())
    }
}

/// secp256k1 recovery over EIP-191 personal messages.
///
/// The digest is treated as a 32-byte message and hashed with the
/// `"\x19Ethereum Signed Message:\n32"` prefix before recovery, which is what
/// wallets produce for `personal_sign` over a raw hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip191Verifier;

impl SignatureVerifier for Eip191Verifier {
    fn recover_signer(&self, digest: B256, signature: &[u8]) -> Result<Address, VerifyError> {
        let sig = parse_signature(signature)?;
        sig.recover_address_from_msg(digest)
            .map_err(|e| VerifyError::InvalidSignature(format!("recovery failed: {e}")))
    }
}

/// Parse 65 signature bytes.
pub fn parse_signature(signature: &[u8]) -> Result<Signature, VerifyError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(VerifyError::InvalidSignature(format!(
            "invalid signature length: expected {SIGNATURE_LENGTH}, got {}",
            signature.len()
        )));
    }

    Signature::try_from(signature)
        .map_err(|e| VerifyError::InvalidSignature(format!("invalid signature: {e}")))
}
