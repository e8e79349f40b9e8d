//! Custodial state of the cheque bank.
//!
//! - [`Ledger`] - Per-account non-negative balances
//! - [`ChequeRegistry`] - Per-cheque redemption, revocation and sign-over state
//!
//! Both are plain owned state with `&mut self` mutators. Atomicity across the
//! two is provided by whoever owns them; every mutator either applies fully or
//! returns an error without touching state.

mod error;
mod ledger;
mod registry;

pub use error::{LedgerError, RegistryError};
pub use ledger::{Ledger, Release};
pub use registry::{ChequeRegistry, ChequeStatus};
