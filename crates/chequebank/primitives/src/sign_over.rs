//! Sign-over links.
//!
//! A payee can hand the right to redeem a cheque to someone else without
//! touching the ledger by signing a [`SignOver`]. Links form a chain of
//! custody: the first link is signed by the cheque's payee, every following
//! link by the previous link's new payee.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, Signature, keccak256};
use alloy_signer::SignerSync;
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::{ChequeId, SIGN_OVER_MAGIC, SignatureVerifier, VerifyError};

/// An ordered sign-over chain, first link first.
pub type SignOverChain = Vec<SignedSignOver>;

/// The signed fields of a sign-over link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOver {
    /// 1-based position within the chain.
    pub counter: u8,
    /// Cheque being signed over.
    pub cheque_id: ChequeId,
    /// Payee handing over the right to redeem (the signer).
    pub old_payee: Address,
    /// Payee receiving the right to redeem.
    pub new_payee: Address,
}

impl SignOver {
    /// Create a new sign-over link.
    pub fn new(counter: u8, cheque_id: ChequeId, old_payee: Address, new_payee: Address) -> Self {
        Self {
            counter,
            cheque_id,
            old_payee,
            new_payee,
        }
    }

    /// Packed encoding of the magic tag and the signed fields.
    ///
    /// The counter packs as a single byte, the same as a Solidity `uint8`.
    pub fn encode_packed(&self) -> Vec<u8> {
        (
            SIGN_OVER_MAGIC,
            FixedBytes::<1>::new([self.counter]),
            self.cheque_id,
            self.old_payee,
            self.new_payee,
        )
            .abi_encode_packed()
    }

    /// Digest the old payee signs.
    pub fn digest(&self) -> B256 {
        keccak256(self.encode_packed())
    }

    /// Sign this link as an EIP-191 personal message.
    pub fn sign<S>(self, signer: &S) -> Result<SignedSignOver, VerifyError>
    where
        S: SignerSync + ?Sized,
    {
        let sig = signer
            .sign_message_sync(self.digest().as_slice())
            .map_err(|e| VerifyError::Signing(e.to_string()))?;
        Ok(SignedSignOver::from_signature(self, sig))
    }
}

/// A signed sign-over link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSignOver {
    /// The signed fields.
    #[serde(rename = "signOverInfo")]
    pub sign_over: SignOver,
    /// ECDSA signature by `old_payee`.
    pub sig: Bytes,
}

impl SignedSignOver {
    /// Create a new signed link.
    pub fn new(sign_over: SignOver, sig: Bytes) -> Self {
        Self { sign_over, sig }
    }

    /// Create a signed link from a link and signature.
    pub fn from_signature(sign_over: SignOver, sig: Signature) -> Self {
        Self {
            sign_over,
            sig: Bytes::copy_from_slice(&sig.as_bytes()),
        }
    }

    /// Verify that this link was signed by its old payee.
    pub fn verify<V>(&self, verifier: &V) -> Result<(), VerifyError>
    where
        V: SignatureVerifier + ?Sized,
    {
        verifier.verify(self.sign_over.digest(), &self.sig, self.sign_over.old_payee)
    }

    /// Serialize a chain to JSON bytes.
    pub fn chain_to_json(chain: &[SignedSignOver]) -> Result<Vec<u8>, VerifyError> {
        serde_json::to_vec_pretty(chain).map_err(|e| VerifyError::Serialization(e.to_string()))
    }

    /// Deserialize a chain from JSON bytes.
    ///
    /// A single link object is accepted as a chain of one.
    pub fn chain_from_json(data: &[u8]) -> Result<SignOverChain, VerifyError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(SignOverChain),
            One(SignedSignOver),
        }

        match serde_json::from_slice(data) {
            Ok(OneOrMany::Many(chain)) => Ok(chain),
            Ok(OneOrMany::One(link)) => Ok(vec![link]),
            Err(e) => Err(VerifyError::Serialization(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Eip191Verifier;
    use alloy_signer_local::PrivateKeySigner;
    use assert_matches::assert_matches;

    fn test_link(old_payee: Address) -> SignOver {
        SignOver::new(
            1,
            B256::repeat_byte(0x11),
            old_payee,
            Address::repeat_byte(0x03),
        )
    }

    #[test]
    fn test_packed_layout() {
        let link = test_link(Address::repeat_byte(0x02));
        let packed = link.encode_packed();

        assert_eq!(packed.len(), 4 + 1 + 32 + 20 + 20);
        assert_eq!(&packed[..4], &[0xFF, 0xFF, 0xDE, 0xAD]);
        assert_eq!(packed[4], 1);
        assert_eq!(&packed[5..37], link.cheque_id.as_slice());
        assert_eq!(&packed[37..57], link.old_payee.as_slice());
        assert_eq!(&packed[57..77], link.new_payee.as_slice());
    }

    #[test]
    fn test_high_counter_packs_as_one_byte() {
        let mut link = test_link(Address::repeat_byte(0x02));
        link.counter = u8::MAX;
        let packed = link.encode_packed();

        assert_eq!(packed.len(), 77);
        assert_eq!(packed[4], 0xFF);
        assert_eq!(&packed[5..37], link.cheque_id.as_slice());
    }

    #[test]
    fn test_counter_changes_digest() {
        let link = test_link(Address::repeat_byte(0x02));
        let mut other = link;
        other.counter = 2;
        assert_ne!(link.digest(), other.digest());
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = PrivateKeySigner::random();
        let signed = test_link(signer.address()).sign(&signer).unwrap();
        signed.verify(&Eip191Verifier).unwrap();
    }

    #[test]
    fn test_verify_wrong_old_payee() {
        let signer = PrivateKeySigner::random();
        let signed = test_link(Address::repeat_byte(0x02))
            .sign(&signer)
            .unwrap();

        assert_matches!(
            signed.verify(&Eip191Verifier),
            Err(VerifyError::WrongSigner { .. })
        );
    }

    #[test]
    fn test_chain_json() {
        let link = SignedSignOver::new(
            test_link(Address::repeat_byte(0x02)),
            Bytes::from(vec![0u8; 65]),
        );
        let json = SignedSignOver::chain_to_json(&[link.clone(), link.clone()]).unwrap();
        let text = String::from_utf8(json.clone()).unwrap();
        assert!(text.contains("\"signOverInfo\""));
        assert!(text.contains("\"oldPayee\""));

        let chain = SignedSignOver::chain_from_json(&json).unwrap();
        assert_eq!(chain, vec![link.clone(), link.clone()]);

        let single = serde_json::to_vec(&link).unwrap();
        assert_eq!(SignedSignOver::chain_from_json(&single).unwrap(), vec![link]);
    }

    #[test]
    fn test_chain_json_rejects_garbage() {
        assert_matches!(
            SignedSignOver::chain_from_json(b"{\"nope\": 1}"),
            Err(VerifyError::Serialization(_))
        );
    }
}
