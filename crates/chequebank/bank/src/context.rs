//! Per-call execution context.

use alloy_primitives::Address;
use chequebank_primitives::Height;

/// Who is calling and at which ledger height.
///
/// The host platform supplies this for every call; the bank never reads
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Authenticated caller.
    pub caller: Address,
    /// Current ledger height.
    pub height: Height,
}

impl CallContext {
    /// Create a new call context.
    pub fn new(caller: Address, height: Height) -> Self {
        Self { caller, height }
    }
}
