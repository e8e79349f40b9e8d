//! Deterministic test accounts and signing helpers.

#![allow(clippy::expect_used, clippy::indexing_slicing)]

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use chequebank_primitives::{Cheque, ChequeId, SignOver, SignOverChain, SignedCheque};

/// Instance address used by tests that don't care about the value.
pub const TEST_INSTANCE: Address = Address::new([0xC0; 20]);

/// A test account with a deterministic key.
#[derive(Debug, Clone)]
pub struct Party {
    signer: PrivateKeySigner,
}

impl Party {
    /// Account whose private key is `seed` repeated 32 times. `seed` must be non-zero.
    pub fn new(seed: u8) -> Self {
        let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(seed))
            .expect("non-zero seed is a valid key");
        Self { signer }
    }

    /// Account address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signing key.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

/// Cheque id derived from a single byte.
pub fn cheque_id(n: u8) -> ChequeId {
    B256::repeat_byte(n)
}

/// Build and sign a cheque from `payer` to `payee` bound to `instance`.
pub fn signed_cheque(
    instance: Address,
    id: ChequeId,
    payer: &Party,
    payee: &Party,
    amount: u64,
    valid_from: u32,
    valid_thru: u32,
) -> SignedCheque {
    Cheque::new(id, payer.address(), payee.address(), U256::from(amount), valid_from, valid_thru)
        .sign(payer.signer(), instance)
        .expect("signing succeeds")
}

/// Sign a custody chain for `id`.
///
/// `holders[0]` is the cheque's payee; each consecutive pair becomes one link
/// signed by its first member, with counters starting at 1.
pub fn sign_over_chain(id: ChequeId, holders: &[&Party]) -> SignOverChain {
    holders
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let counter = u8::try_from(i + 1).expect("chain fits in u8");
            SignOver::new(counter, id, pair[0].address(), pair[1].address())
                .sign(pair[0].signer())
                .expect("signing succeeds")
        })
        .collect()
}
