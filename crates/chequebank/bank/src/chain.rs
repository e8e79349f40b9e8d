//! Sign-over chain validation.
//!
//! Chains are never stored; every call that relies on one re-validates the
//! full link list from the cheque's original payee, so a partial or forged
//! history can't be spliced onto a previously accepted one.

use alloy_primitives::Address;
use chequebank_primitives::{Cheque, MAX_SIGN_OVER_DEPTH, SignatureVerifier, SignedSignOver};

use crate::{BankError, ChainFault};

/// Holder transition produced by a valid chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChain {
    /// Signer of the last link.
    pub payer: Address,
    /// Recipient of the last link; the party now entitled to redeem.
    pub payee: Address,
    /// Number of links.
    pub depth: usize,
}

impl ResolvedChain {
    /// Whether the chain passes through the `payer -> payee` link.
    pub(crate) fn extends(chain: &[SignedSignOver], payer: Address, payee: Address) -> bool {
        chain
            .iter()
            .any(|link| link.sign_over.old_payee == payer && link.sign_over.new_payee == payee)
    }
}

/// Reject chains deeper than [`MAX_SIGN_OVER_DEPTH`].
pub fn ensure_depth(chain: &[SignedSignOver]) -> Result<(), BankError> {
    if chain.len() > MAX_SIGN_OVER_DEPTH {
        return Err(BankError::ChainTooLong {
            len: chain.len(),
            max: MAX_SIGN_OVER_DEPTH,
        });
    }
    Ok(())
}

/// Validate `chain` against `cheque` and fold it into the final holder.
///
/// Checks, per link `i`:
/// - `counter == i + 1`
/// - `cheque_id` matches the cheque
/// - `old_payee` is the cheque's payee for `i == 0`, otherwise the previous
///   link's `new_payee`
/// - the signature recovers to `old_payee`
///
/// Depth is checked before any signature.
pub fn validate_chain<V>(
    verifier: &V,
    cheque: &Cheque,
    chain: &[SignedSignOver],
) -> Result<ResolvedChain, BankError>
where
    V: SignatureVerifier + ?Sized,
{
    ensure_depth(chain)?;

    let mut holder = cheque.payee;
    let mut last = None;

    for (index, link) in chain.iter().enumerate() {
        let so = &link.sign_over;

        if usize::from(so.counter) != index + 1 {
            return Err(BankError::ChainBroken {
                index,
                fault: ChainFault::Counter {
                    expected: index + 1,
                    found: so.counter,
                },
            });
        }
        if so.cheque_id != cheque.cheque_id {
            return Err(BankError::ChainBroken {
                index,
                fault: ChainFault::ChequeId {
                    found: so.cheque_id,
                },
            });
        }
        if so.old_payee != holder {
            return Err(BankError::ChainBroken {
                index,
                fault: ChainFault::OldPayee {
                    expected: holder,
                    found: so.old_payee,
                },
            });
        }

        link.verify(verifier)?;

        holder = so.new_payee;
        last = Some(so);
    }

    let last = last.ok_or(BankError::ChainBroken {
        index: 0,
        fault: ChainFault::Empty,
    })?;

    Ok(ResolvedChain {
        payer: last.old_payee,
        payee: last.new_payee,
        depth: chain.len(),
    })
}
