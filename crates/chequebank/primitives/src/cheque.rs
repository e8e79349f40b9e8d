//! Cheques.
//!
//! A cheque is a payer's signed promise to pay `amount` to `payee`, redeemable
//! against one ledger instance while the ledger height lies within
//! `[valid_from, valid_thru]`. Cheques are created and exchanged off-ledger;
//! the ledger first sees one when it is redeemed, revoked or signed over.

use alloy_primitives::{Address, B256, Bytes, Signature, U256, keccak256};
use alloy_signer::SignerSync;
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::{ChequeId, Height, SignatureVerifier, VerifyError};

/// The signed fields of a cheque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cheque {
    /// Payer-chosen unique identifier.
    pub cheque_id: ChequeId,
    /// Account debited on redemption.
    pub payer: Address,
    /// Account entitled to redeem (before any sign-over).
    pub payee: Address,
    /// Amount in the smallest currency unit.
    pub amount: U256,
    /// First ledger height at which the cheque may be redeemed.
    pub valid_from: u32,
    /// Last ledger height at which the cheque may be redeemed.
    pub valid_thru: u32,
}

impl Cheque {
    /// Create a new cheque.
    pub fn new(
        cheque_id: ChequeId,
        payer: Address,
        payee: Address,
        amount: U256,
        valid_from: u32,
        valid_thru: u32,
    ) -> Self {
        Self {
            cheque_id,
            payer,
            payee,
            amount,
            valid_from,
            valid_thru,
        }
    }

    /// Packed encoding of the signed fields, bound to a ledger `instance`.
    pub fn encode_packed(&self, instance: Address) -> Vec<u8> {
        (
            self.cheque_id,
            self.payer,
            self.payee,
            self.amount,
            instance,
            self.valid_from,
            self.valid_thru,
        )
            .abi_encode_packed()
    }

    /// Digest the payer signs for a given ledger `instance`.
    pub fn digest(&self, instance: Address) -> B256 {
        keccak256(self.encode_packed(instance))
    }

    /// Whether the amount is positive and the validity window is not inverted.
    pub fn is_well_formed(&self) -> bool {
        !self.amount.is_zero() && self.valid_from <= self.valid_thru
    }

    /// Whether `height` lies within the validity window (both bounds inclusive).
    pub fn is_active_at(&self, height: Height) -> bool {
        Height::from(self.valid_from) <= height && height <= Height::from(self.valid_thru)
    }

    /// Sign this cheque for `instance` as an EIP-191 personal message.
    pub fn sign<S>(self, signer: &S, instance: Address) -> Result<SignedCheque, VerifyError>
    where
        S: SignerSync + ?Sized,
    {
        let digest = self.digest(instance);
        let sig = signer
            .sign_message_sync(digest.as_slice())
            .map_err(|e| VerifyError::Signing(e.to_string()))?;
        Ok(SignedCheque::from_signature(self, sig))
    }
}

/// A signed cheque ready for transmission or redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCheque {
    /// The signed fields.
    #[serde(rename = "chequeInfo")]
    pub cheque: Cheque,
    /// ECDSA signature by the payer (65 bytes: r[32] + s[32] + v[1]).
    pub sig: Bytes,
}

impl SignedCheque {
    /// Create a new signed cheque.
    pub fn new(cheque: Cheque, sig: Bytes) -> Self {
        Self { cheque, sig }
    }

    /// Create a signed cheque from a cheque and signature.
    pub fn from_signature(cheque: Cheque, sig: Signature) -> Self {
        Self {
            cheque,
            sig: Bytes::copy_from_slice(&sig.as_bytes()),
        }
    }

    /// The cheque identifier.
    pub fn id(&self) -> ChequeId {
        self.cheque.cheque_id
    }

    /// Recover the signer address from the signature.
    pub fn recover_signer<V>(&self, verifier: &V, instance: Address) -> Result<Address, VerifyError>
    where
        V: SignatureVerifier + ?Sized,
    {
        verifier.recover_signer(self.cheque.digest(instance), &self.sig)
    }

    /// Verify that this cheque was signed by its payer for `instance`.
    pub fn verify<V>(&self, verifier: &V, instance: Address) -> Result<(), VerifyError>
    where
        V: SignatureVerifier + ?Sized,
    {
        verifier.verify(self.cheque.digest(instance), &self.sig, self.cheque.payer)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, VerifyError> {
        serde_json::to_vec_pretty(self).map_err(|e| VerifyError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self, VerifyError> {
        serde_json::from_slice(data).map_err(|e| VerifyError::Serialization(e.to_string()))
    }
}
