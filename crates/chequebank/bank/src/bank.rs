//! The cheque bank service.

use alloy_primitives::{Address, U256};
use chequebank_ledger::{ChequeRegistry, ChequeStatus, Ledger, RegistryError, Release};
use chequebank_primitives::{
    ChequeId, Eip191Verifier, SignatureVerifier, SignedCheque, SignedSignOver,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::{
    BankError, BankSnapshot, CallContext, ChainFault, ResolvedChain,
    chain::{ensure_depth, validate_chain},
    observe::{Operation, observe},
};

/// Outcome of a successful redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redemption {
    /// Redeemed cheque.
    pub cheque_id: ChequeId,
    /// Account debited (always the cheque's original payer).
    pub payer: Address,
    /// Account credited.
    pub payee: Address,
    /// Amount moved.
    pub amount: U256,
}

/// Mutable state guarded as one unit.
#[derive(Debug, Default)]
pub(crate) struct BankState {
    pub(crate) ledger: Ledger,
    pub(crate) registry: ChequeRegistry,
}

/// Custodial ledger that settles offline-signed cheques.
///
/// Owns the [`Ledger`] and [`ChequeRegistry`] behind a single lock. Every
/// call takes the lock once, runs all validation, and only then mutates, so
/// calls are atomic and totally ordered and a rejected call changes nothing.
///
/// Cheques and sign-over links are authenticated with the verifier `V`
/// against digests bound to this bank's `instance` address.
pub struct ChequeBank<V = Eip191Verifier> {
    instance: Address,
    verifier: V,
    state: Mutex<BankState>,
}

impl ChequeBank<Eip191Verifier> {
    /// Create an empty bank using EIP-191 signature recovery.
    pub fn new(instance: Address) -> Self {
        Self::with_verifier(instance, Eip191Verifier)
    }
}

impl<V: SignatureVerifier> ChequeBank<V> {
    /// Create an empty bank with a custom verifier.
    pub fn with_verifier(instance: Address, verifier: V) -> Self {
        Self {
            instance,
            verifier,
            state: Mutex::new(BankState::default()),
        }
    }

    /// Restore a bank from a snapshot.
    pub fn from_snapshot(snapshot: BankSnapshot, verifier: V) -> Self {
        Self {
            instance: snapshot.instance,
            verifier,
            state: Mutex::new(BankState {
                ledger: snapshot.ledger,
                registry: snapshot.cheques,
            }),
        }
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> BankSnapshot {
        let state = self.state.lock();
        BankSnapshot {
            instance: self.instance,
            ledger: state.ledger.clone(),
            cheques: state.registry.clone(),
        }
    }

    /// Ledger instance identity cheques are bound to.
    pub fn instance(&self) -> Address {
        self.instance
    }

    /// Current balance of `account`.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.state.lock().ledger.balance_of(account)
    }

    /// Status of `payer`'s cheque `id`.
    ///
    /// Cheque ids are unique per payer, so the payer is part of the key.
    pub fn status_of(&self, payer: &Address, id: &ChequeId) -> ChequeStatus {
        self.state.lock().registry.status(payer, id)
    }

    /// Credit `amount` to the caller.
    pub fn deposit(&self, ctx: &CallContext, amount: U256) -> Result<U256, BankError> {
        let result = self
            .state
            .lock()
            .ledger
            .deposit(ctx.caller, amount)
            .map_err(BankError::from);
        if let Ok(balance) = &result {
            debug!(account = %ctx.caller, %amount, %balance, "deposit");
        }
        observe(Operation::Deposit, result)
    }

    /// Debit `amount` from the caller and release it to the caller.
    pub fn withdraw(&self, ctx: &CallContext, amount: U256) -> Result<Release, BankError> {
        let result = self
            .state
            .lock()
            .ledger
            .withdraw(ctx.caller, amount)
            .map_err(BankError::from);
        if result.is_ok() {
            debug!(account = %ctx.caller, %amount, "withdraw");
        }
        observe(Operation::Withdraw, result)
    }

    /// Debit `amount` from the caller and release it to `recipient`.
    pub fn withdraw_to(
        &self,
        ctx: &CallContext,
        amount: U256,
        recipient: Address,
    ) -> Result<Release, BankError> {
        let result = self
            .state
            .lock()
            .ledger
            .withdraw_to(ctx.caller, amount, recipient)
            .map_err(BankError::from);
        if result.is_ok() {
            debug!(account = %ctx.caller, %recipient, %amount, "withdraw to");
        }
        observe(Operation::WithdrawTo, result)
    }

    /// Redeem a cheque that has not been signed over.
    ///
    /// The caller must be the cheque's payee. Debits the payer, credits the
    /// caller, and marks the cheque redeemed.
    pub fn redeem(&self, ctx: &CallContext, cheque: &SignedCheque) -> Result<Redemption, BankError> {
        let mut state = self.state.lock();
        let result = self
            .check_direct(&state, ctx, cheque)
            .and_then(|()| Self::settle(&mut state, cheque, ctx.caller));
        drop(state);
        observe(Operation::Redeem, result)
    }

    /// Redeem a cheque through a sign-over chain.
    ///
    /// The chain is validated from scratch; it need not have been notified
    /// first. If a sign-over was notified, the chain must pass through it.
    /// The original payer is debited and the chain's final payee (the
    /// caller) is credited.
    pub fn redeem_sign_over(
        &self,
        ctx: &CallContext,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<Redemption, BankError> {
        let result = ensure_depth(chain).and_then(|()| {
            let mut state = self.state.lock();
            let resolved = self.check_transferred(&state, ctx, cheque, chain)?;
            Self::settle(&mut state, cheque, resolved.payee)
        });
        observe(Operation::RedeemSignOver, result)
    }

    /// Record the holder resolved by a sign-over chain.
    ///
    /// The caller must be the chain's final payee. Re-notifying with a longer
    /// chain that extends the notified one moves the holder forward.
    pub fn notify_sign_over(
        &self,
        ctx: &CallContext,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<ResolvedChain, BankError> {
        let result = ensure_depth(chain).and_then(|()| {
            Self::check_well_formed(cheque)?;
            cheque.verify(&self.verifier, self.instance)?;

            let mut state = self.state.lock();
            let resolved = self.check_chain(&state, ctx, cheque, chain)?;
            Self::check_open(&state, cheque)?;

            state.registry.update_sign_over(
                cheque.cheque.payer,
                cheque.id(),
                resolved.payer,
                resolved.payee,
            );
            debug!(
                id = %cheque.id(),
                payer = %resolved.payer,
                payee = %resolved.payee,
                depth = resolved.depth,
                "sign-over notified"
            );
            Ok(resolved)
        });
        observe(Operation::NotifySignOver, result)
    }

    /// Permanently revoke a cheque. Only its payer may do so.
    pub fn revoke(&self, ctx: &CallContext, cheque: &SignedCheque) -> Result<(), BankError> {
        let payer = cheque.cheque.payer;
        let result = cheque
            .verify(&self.verifier, self.instance)
            .map_err(BankError::from)
            .and_then(|()| {
                if ctx.caller != payer {
                    return Err(BankError::WrongPayer {
                        expected: payer,
                        caller: ctx.caller,
                    });
                }
                self.state.lock().registry.mark_revoked(payer, cheque.id())?;
                debug!(id = %cheque.id(), %payer, "cheque revoked");
                Ok(())
            });
        observe(Operation::Revoke, result)
    }

    /// Whether `payee` could redeem `cheque` at `ctx.height`.
    ///
    /// With an empty `chain` the cheque must not have been signed over and
    /// `payee` must be its payee; otherwise `payee` must be the chain's final
    /// payee. Balances are not considered. `ctx.caller` is ignored.
    pub fn is_cheque_valid(
        &self,
        ctx: &CallContext,
        payee: Address,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> bool {
        self.validate(&CallContext::new(payee, ctx.height), cheque, chain)
            .is_ok()
    }

    /// Run every redemption check for `ctx.caller` without mutating.
    ///
    /// Returns the payee that would be credited.
    pub fn validate(
        &self,
        ctx: &CallContext,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<Address, BankError> {
        ensure_depth(chain)?;
        let state = self.state.lock();
        if chain.is_empty() {
            self.check_direct(&state, ctx, cheque)?;
            Ok(cheque.cheque.payee)
        } else {
            self.check_transferred(&state, ctx, cheque, chain)
                .map(|resolved| resolved.payee)
        }
    }

    /// Checks for redeeming without a chain.
    fn check_direct(
        &self,
        state: &BankState,
        ctx: &CallContext,
        cheque: &SignedCheque,
    ) -> Result<(), BankError> {
        self.check_cheque(state, ctx, cheque)?;

        let info = &cheque.cheque;
        if let Some(latest_payee) = state.registry.latest_payee(&info.payer, &info.cheque_id) {
            return Err(BankError::SignedOver {
                id: info.cheque_id,
                latest_payee,
            });
        }
        if ctx.caller != info.payee {
            return Err(BankError::WrongPayee {
                expected: info.payee,
                caller: ctx.caller,
            });
        }
        Ok(())
    }

    /// Checks for redeeming through a chain.
    fn check_transferred(
        &self,
        state: &BankState,
        ctx: &CallContext,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<ResolvedChain, BankError> {
        self.check_cheque(state, ctx, cheque)?;
        self.check_chain(state, ctx, cheque, chain)
    }

    /// Signature, status and validity window of the cheque itself.
    fn check_cheque(
        &self,
        state: &BankState,
        ctx: &CallContext,
        cheque: &SignedCheque,
    ) -> Result<(), BankError> {
        Self::check_well_formed(cheque)?;
        cheque.verify(&self.verifier, self.instance)?;
        Self::check_open(state, cheque)?;

        let info = &cheque.cheque;
        if ctx.height < u64::from(info.valid_from) {
            return Err(BankError::NotYetActive {
                id: info.cheque_id,
                valid_from: info.valid_from,
                height: ctx.height,
            });
        }
        if ctx.height > u64::from(info.valid_thru) {
            return Err(BankError::Expired {
                id: info.cheque_id,
                valid_thru: info.valid_thru,
                height: ctx.height,
            });
        }
        Ok(())
    }

    /// Chain validity, consistency with any notified sign-over, and caller.
    fn check_chain(
        &self,
        state: &BankState,
        ctx: &CallContext,
        cheque: &SignedCheque,
        chain: &[SignedSignOver],
    ) -> Result<ResolvedChain, BankError> {
        let resolved = validate_chain(&self.verifier, &cheque.cheque, chain)?;

        if ctx.caller != resolved.payee {
            return Err(BankError::WrongPayee {
                expected: resolved.payee,
                caller: ctx.caller,
            });
        }

        let status = state.registry.status(&cheque.cheque.payer, &cheque.id());
        if let (Some(payer), Some(payee)) = (status.latest_payer, status.latest_payee)
            && !ResolvedChain::extends(chain, payer, payee)
        {
            return Err(BankError::ChainBroken {
                index: resolved.depth.saturating_sub(1),
                fault: ChainFault::Diverged {
                    latest_payee: payee,
                },
            });
        }
        Ok(resolved)
    }

    fn check_well_formed(cheque: &SignedCheque) -> Result<(), BankError> {
        let info = &cheque.cheque;
        if info.amount.is_zero() {
            return Err(BankError::MalformedCheque {
                id: info.cheque_id,
                reason: "zero amount",
            });
        }
        if info.valid_from > info.valid_thru {
            return Err(BankError::MalformedCheque {
                id: info.cheque_id,
                reason: "validity window ends before it starts",
            });
        }
        Ok(())
    }

    /// Reject redeemed or revoked cheques.
    fn check_open(state: &BankState, cheque: &SignedCheque) -> Result<(), BankError> {
        let status = state.registry.status(&cheque.cheque.payer, &cheque.id());
        if status.redeemed {
            return Err(RegistryError::AlreadyRedeemed(cheque.id()).into());
        }
        if status.revoked {
            return Err(RegistryError::Revoked(cheque.id()).into());
        }
        Ok(())
    }

    /// Move funds and mark redeemed. All checks have passed.
    fn settle(
        state: &mut BankState,
        cheque: &SignedCheque,
        payee: Address,
    ) -> Result<Redemption, BankError> {
        let info = &cheque.cheque;
        // Status was checked open under the same lock; marking cannot fail.
        state.ledger.transfer(info.payer, payee, info.amount)?;
        state.registry.mark_redeemed(info.payer, info.cheque_id)?;

        debug!(
            id = %info.cheque_id,
            payer = %info.payer,
            %payee,
            amount = %info.amount,
            "cheque redeemed"
        );
        Ok(Redemption {
            cheque_id: info.cheque_id,
            payer: info.payer,
            payee,
            amount: info.amount,
        })
    }
}
