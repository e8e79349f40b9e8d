//! Cheque protocol over the custodial ledger.
//!
//! [`ChequeBank`] is the externally callable surface:
//!
//! - Custody: `deposit`, `withdraw`, `withdraw_to`, `balance_of`
//! - Cheques: `redeem`, `revoke`, `status_of`, `is_cheque_valid`
//! - Sign-overs: `notify_sign_over`, `redeem_sign_over`
//!
//! Every call receives a [`CallContext`] carrying the authenticated caller and
//! the current ledger height. Calls are serialized on a single lock and either
//! apply fully or fail with a [`BankError`] leaving state unchanged.
//!
//! # Example
//!
//! ```ignore
//! let bank = ChequeBank::new(instance);
//! bank.deposit(&CallContext::new(payer, 0), U256::from(5))?;
//!
//! let signed = cheque.sign(&payer_signer, bank.instance())?;
//! bank.redeem(&CallContext::new(payee, 10), &signed)?;
//! ```

mod bank;
mod chain;
mod context;
mod error;
mod observe;
mod snapshot;

pub use bank::{ChequeBank, Redemption};
pub use chain::{ResolvedChain, ensure_depth, validate_chain};
pub use context::CallContext;
pub use error::{BankError, ChainFault, ErrorKind};
pub use observe::{OPERATIONS_TOTAL, Operation};
pub use snapshot::{BankSnapshot, SnapshotError};

pub use chequebank_ledger::{ChequeStatus, Release};
