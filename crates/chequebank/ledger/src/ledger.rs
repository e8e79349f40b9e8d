//! Account balances.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::LedgerError;

/// Funds leaving custody as the result of a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Account that was debited.
    pub account: Address,
    /// Recipient of the released funds.
    pub recipient: Address,
    /// Amount released.
    pub amount: U256,
}

/// Mapping from account to balance.
///
/// Absent accounts have a zero balance. Balances are unsigned, so no
/// operation can leave one negative: every debit is checked first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    balances: BTreeMap<Address, U256>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `account`.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Sum of all balances held in custody.
    pub fn total(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::ZERO, |acc, b| acc.saturating_add(*b))
    }

    /// Accounts with a non-zero balance.
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.balances.iter().filter(|(_, b)| !b.is_zero())
    }

    /// Credit `amount` to `account`, returning the new balance.
    pub fn deposit(&mut self, account: Address, amount: U256) -> Result<U256, LedgerError> {
        let balance = self
            .balance_of(&account)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account })?;
        self.balances.insert(account, balance);
        trace!(%account, %amount, %balance, "deposit");
        Ok(balance)
    }

    /// Debit `amount` from `account` and release it to the same account.
    pub fn withdraw(&mut self, account: Address, amount: U256) -> Result<Release, LedgerError> {
        self.withdraw_to(account, amount, account)
    }

    /// Debit `amount` from `account` and release it to `recipient`.
    pub fn withdraw_to(
        &mut self,
        account: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<Release, LedgerError> {
        self.debit(account, amount)?;
        trace!(%account, %recipient, %amount, "withdraw");
        Ok(Release {
            account,
            recipient,
            amount,
        })
    }

    /// Check that `account` can be debited `amount` without mutating.
    pub fn ensure_funds(&self, account: &Address, amount: U256) -> Result<(), LedgerError> {
        let balance = self.balance_of(account);
        if amount > balance {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                balance,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Move `amount` from `from` to `to` inside custody.
    ///
    /// Either both sides are updated or neither is.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.ensure_funds(&from, amount)?;
        if from != to {
            // Credit is checked before the debit is applied.
            let credited = self
                .balance_of(&to)
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow { account: to })?;
            self.debit(from, amount)?;
            self.balances.insert(to, credited);
        }
        trace!(%from, %to, %amount, "transfer");
        Ok(())
    }

    fn debit(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        self.ensure_funds(&account, amount)?;
        let remaining = self.balance_of(&account) - amount;
        if remaining.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        Ok(())
    }
}
