//! Custody, redemption and revocation through the public bank surface.

use alloy_primitives::{Address, U256};
use assert_matches::assert_matches;
use chequebank_bank::{BankError, CallContext, ChequeBank, ErrorKind, Redemption};
use chequebank_ledger::{LedgerError, RegistryError};
use chequebank_primitives::{Cheque, VerifyError};
use chequebank_test_utils::{Party, TEST_INSTANCE, cheque_id, signed_cheque};
use proptest::prelude::*;

fn ctx(party: &Party, height: u64) -> CallContext {
    CallContext::new(party.address(), height)
}

fn funded_bank(payer: &Party, amount: u64) -> ChequeBank {
    let bank = ChequeBank::new(TEST_INSTANCE);
    bank.deposit(&ctx(payer, 0), U256::from(amount)).unwrap();
    bank
}

#[test]
fn deposit_and_withdraw() {
    let p = Party::new(1);
    let bank = ChequeBank::new(TEST_INSTANCE);

    assert_eq!(bank.deposit(&ctx(&p, 0), U256::from(5u64)).unwrap(), U256::from(5u64));
    assert_eq!(bank.deposit(&ctx(&p, 0), U256::from(2u64)).unwrap(), U256::from(7u64));

    let release = bank.withdraw(&ctx(&p, 0), U256::from(3u64)).unwrap();
    assert_eq!(release.recipient, p.address());
    assert_eq!(release.amount, U256::from(3u64));
    assert_eq!(bank.balance_of(&p.address()), U256::from(4u64));
}

#[test]
fn withdraw_more_than_balance() {
    let p = Party::new(1);
    let bank = funded_bank(&p, 1);

    let err = bank.withdraw(&ctx(&p, 0), U256::from(2u64)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(bank.balance_of(&p.address()), U256::from(1u64));
}

#[test]
fn withdraw_to_other_recipient() {
    let p = Party::new(1);
    let bank = funded_bank(&p, 5);
    let recipient = Address::repeat_byte(0x42);

    let release = bank.withdraw_to(&ctx(&p, 0), U256::from(5u64), recipient).unwrap();
    assert_eq!(release.account, p.address());
    assert_eq!(release.recipient, recipient);
    assert_eq!(bank.balance_of(&p.address()), U256::ZERO);
    // Released funds leave the ledger rather than crediting the recipient.
    assert_eq!(bank.balance_of(&recipient), U256::ZERO);
}

#[test]
fn redeem_moves_funds_once() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    let redemption = bank.redeem(&ctx(&a, 10), &cheque).unwrap();
    assert_eq!(
        redemption,
        Redemption {
            cheque_id: cheque_id(1),
            payer: p.address(),
            payee: a.address(),
            amount: U256::from(3u64),
        }
    );
    assert_eq!(bank.balance_of(&p.address()), U256::from(2u64));
    assert_eq!(bank.balance_of(&a.address()), U256::from(3u64));
    assert!(bank.status_of(&p.address(), &cheque_id(1)).redeemed);

    assert_matches!(
        bank.redeem(&ctx(&a, 11), &cheque),
        Err(BankError::Registry(RegistryError::AlreadyRedeemed(_)))
    );
    assert_eq!(bank.balance_of(&a.address()), U256::from(3u64));
}

#[test]
fn redeem_requires_payee() {
    let (p, a, d) = (Party::new(1), Party::new(2), Party::new(4));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    assert_matches!(
        bank.redeem(&ctx(&d, 10), &cheque),
        Err(BankError::WrongPayee { expected, caller })
            if expected == a.address() && caller == d.address()
    );
    assert!(!bank.status_of(&p.address(), &cheque_id(1)).redeemed);
}

#[test]
fn redeem_insufficient_balance_changes_nothing() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 1);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);
    let before = bank.snapshot();

    assert_matches!(
        bank.redeem(&ctx(&a, 10), &cheque),
        Err(BankError::Ledger(LedgerError::InsufficientBalance { .. }))
    );
    assert_eq!(bank.snapshot(), before);

    // Topping up makes the same cheque redeemable.
    bank.deposit(&ctx(&p, 0), U256::from(2u64)).unwrap();
    bank.redeem(&ctx(&a, 10), &cheque).unwrap();
    assert_eq!(bank.balance_of(&p.address()), U256::ZERO);
}

#[test]
fn validity_window_is_inclusive() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 10);
    let early = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 1, 10, 20);
    let late = signed_cheque(TEST_INSTANCE, cheque_id(2), &p, &a, 1, 10, 20);

    assert_matches!(
        bank.redeem(&ctx(&a, 9), &early),
        Err(BankError::NotYetActive { valid_from: 10, height: 9, .. })
    );
    bank.redeem(&ctx(&a, 10), &early).unwrap();

    assert_matches!(
        bank.redeem(&ctx(&a, 21), &late),
        Err(BankError::Expired { valid_thru: 20, height: 21, .. })
    );
    bank.redeem(&ctx(&a, 20), &late).unwrap();
}

#[test]
fn forged_cheque_rejected() {
    let (p, a, mallory) = (Party::new(1), Party::new(2), Party::new(9));
    let bank = funded_bank(&p, 5);

    // Claims p as payer, signed by mallory.
    let forged = Cheque::new(cheque_id(1), p.address(), a.address(), U256::from(3u64), 0, 100)
        .sign(mallory.signer(), TEST_INSTANCE)
        .unwrap();

    assert_matches!(
        bank.redeem(&ctx(&a, 10), &forged),
        Err(BankError::InvalidSignature(VerifyError::WrongSigner { .. }))
    );
    assert_eq!(bank.balance_of(&p.address()), U256::from(5u64));
}

#[test]
fn cheque_bound_to_instance() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let other_instance = Address::repeat_byte(0xEE);
    let cheque = signed_cheque(other_instance, cheque_id(1), &p, &a, 3, 0, 100);

    let err = bank.redeem(&ctx(&a, 10), &cheque).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSignature);
}

#[test]
fn tampered_amount_rejected() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let mut cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 1, 0, 100);
    cheque.cheque.amount = U256::from(5u64);

    let err = bank.redeem(&ctx(&a, 10), &cheque).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSignature);
}

#[test]
fn malformed_cheques_rejected() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);

    let zero = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 0, 0, 100);
    assert_matches!(
        bank.redeem(&ctx(&a, 10), &zero),
        Err(BankError::MalformedCheque { .. })
    );

    let inverted = signed_cheque(TEST_INSTANCE, cheque_id(2), &p, &a, 1, 50, 40);
    assert_matches!(
        bank.redeem(&ctx(&a, 45), &inverted),
        Err(BankError::MalformedCheque { .. })
    );
}

#[test]
fn revoked_cheque_never_redeemable() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    bank.revoke(&ctx(&p, 5), &cheque).unwrap();
    assert!(bank.status_of(&p.address(), &cheque_id(1)).revoked);

    assert_matches!(
        bank.redeem(&ctx(&a, 10), &cheque),
        Err(BankError::Registry(RegistryError::Revoked(_)))
    );
    assert_matches!(
        bank.revoke(&ctx(&p, 6), &cheque),
        Err(BankError::Registry(RegistryError::Revoked(_)))
    );
    assert_eq!(bank.balance_of(&p.address()), U256::from(5u64));
}

#[test]
fn only_payer_may_revoke() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    assert_matches!(
        bank.revoke(&ctx(&a, 5), &cheque),
        Err(BankError::WrongPayer { expected, .. }) if expected == p.address()
    );
    assert!(!bank.status_of(&p.address(), &cheque_id(1)).revoked);
}

#[test]
fn redeemed_cheque_cannot_be_revoked() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    bank.redeem(&ctx(&a, 10), &cheque).unwrap();
    assert_matches!(
        bank.revoke(&ctx(&p, 11), &cheque),
        Err(BankError::Registry(RegistryError::AlreadyRedeemed(_)))
    );
    let status = bank.status_of(&p.address(), &cheque_id(1));
    assert!(status.redeemed && !status.revoked);
}

#[test]
fn revoke_outside_window() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 10, 20);

    // Revocation is not bound to the validity window.
    bank.revoke(&ctx(&p, 500), &cheque).unwrap();
    assert!(bank.status_of(&p.address(), &cheque_id(1)).revoked);
}

#[test]
fn same_id_from_other_payer_is_independent() {
    let (p, a, q) = (Party::new(1), Party::new(2), Party::new(3));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);

    // q reuses p's id on a cheque of its own and revokes it.
    let reused = signed_cheque(TEST_INSTANCE, cheque_id(1), &q, &a, 3, 0, 100);
    bank.revoke(&ctx(&q, 5), &reused).unwrap();
    assert!(bank.status_of(&q.address(), &cheque_id(1)).revoked);
    assert!(!bank.status_of(&p.address(), &cheque_id(1)).revoked);

    bank.redeem(&ctx(&a, 10), &cheque).unwrap();
    assert_eq!(bank.balance_of(&a.address()), U256::from(3u64));
    assert_matches!(
        bank.redeem(&ctx(&a, 10), &reused),
        Err(BankError::Registry(RegistryError::Revoked(_)))
    );
}

#[test]
fn unseen_cheque_has_default_status() {
    let bank = ChequeBank::new(TEST_INSTANCE);
    let status = bank.status_of(&Address::repeat_byte(1), &cheque_id(7));
    assert!(!status.redeemed);
    assert!(!status.revoked);
    assert_eq!(status.latest_payer, None);
    assert_eq!(status.latest_payee, None);
}

#[test]
fn is_cheque_valid_ignores_balance() {
    let (p, a, d) = (Party::new(1), Party::new(2), Party::new(4));
    let bank = ChequeBank::new(TEST_INSTANCE);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 10, 20);

    assert!(bank.is_cheque_valid(&ctx(&d, 15), a.address(), &cheque, &[]));
    assert!(!bank.is_cheque_valid(&ctx(&d, 15), d.address(), &cheque, &[]));
    assert!(!bank.is_cheque_valid(&ctx(&d, 21), a.address(), &cheque, &[]));
}

#[test]
fn snapshot_restores_state() {
    let (p, a) = (Party::new(1), Party::new(2));
    let bank = funded_bank(&p, 5);
    let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 3, 0, 100);
    bank.redeem(&ctx(&a, 10), &cheque).unwrap();

    let restored =
        ChequeBank::from_snapshot(bank.snapshot(), chequebank_primitives::Eip191Verifier);
    assert_eq!(restored.instance(), TEST_INSTANCE);
    assert_eq!(restored.balance_of(&a.address()), U256::from(3u64));
    assert_matches!(
        restored.redeem(&ctx(&a, 10), &cheque),
        Err(BankError::Registry(RegistryError::AlreadyRedeemed(_)))
    );
}

proptest! {
    #[test]
    fn redeem_succeeds_only_inside_window(
        valid_from in 0u32..1_000,
        span in 0u32..1_000,
        height in 0u64..3_000,
    ) {
        let (p, a) = (Party::new(1), Party::new(2));
        let bank = funded_bank(&p, 1);
        let valid_thru = valid_from + span;
        let cheque = signed_cheque(TEST_INSTANCE, cheque_id(1), &p, &a, 1, valid_from, valid_thru);

        let inside = u64::from(valid_from) <= height && height <= u64::from(valid_thru);
        let result = bank.redeem(&ctx(&a, height), &cheque);
        prop_assert_eq!(result.is_ok(), inside);
        prop_assert_eq!(bank.status_of(&p.address(), &cheque_id(1)).redeemed, inside);
    }

    #[test]
    fn balances_are_conserved(
        ops in prop::collection::vec((0u8..3, 1u64..50), 1..40),
    ) {
        let (p, a) = (Party::new(1), Party::new(2));
        let bank = ChequeBank::new(TEST_INSTANCE);
        let mut expected_total = U256::ZERO;

        for (i, (op, amount)) in ops.into_iter().enumerate() {
            let amount_u = U256::from(amount);
            match op {
                0 => {
                    bank.deposit(&ctx(&p, 0), amount_u).unwrap();
                    expected_total += amount_u;
                }
                1 => {
                    if bank.withdraw(&ctx(&p, 0), amount_u).is_ok() {
                        expected_total -= amount_u;
                    }
                }
                _ => {
                    let id = cheque_id(u8::try_from(i % 255 + 1).unwrap());
                    let cheque = signed_cheque(TEST_INSTANCE, id, &p, &a, amount, 0, 10);
                    let _ = bank.redeem(&ctx(&a, 5), &cheque);
                }
            }
            let total = bank.balance_of(&p.address()) + bank.balance_of(&a.address());
            prop_assert_eq!(total, expected_total);
        }
    }
}
