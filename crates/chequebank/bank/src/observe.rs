//! Operation counters and rejection logging.

use tracing::debug;

use crate::BankError;

/// Counter of protocol calls, labelled by `op` and `outcome`.
pub const OPERATIONS_TOTAL: &str = "chequebank_operations_total";

/// Protocol call names used in metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Deposit,
    Withdraw,
    WithdrawTo,
    Redeem,
    Revoke,
    NotifySignOver,
    RedeemSignOver,
}

/// Record the outcome of `op` and pass the result through.
pub(crate) fn observe<T>(op: Operation, result: Result<T, BankError>) -> Result<T, BankError> {
    let name: &'static str = op.into();
    match &result {
        Ok(_) => {
            ::metrics::counter!(OPERATIONS_TOTAL, "op" => name, "outcome" => "ok").increment(1);
        }
        Err(err) => {
            let kind: &'static str = err.kind().into();
            debug!(op = name, %err, "call rejected");
            ::metrics::counter!(OPERATIONS_TOTAL, "op" => name, "outcome" => kind).increment(1);
        }
    }
    result
}
