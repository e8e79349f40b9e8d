//! Per-cheque status.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use chequebank_primitives::ChequeId;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::RegistryError;

/// Status of a single cheque as seen by the ledger.
///
/// Cheques the ledger has never touched report the default: not redeemed, not
/// revoked, and no resolved sign-over (meaning the cheque's own payer/payee
/// apply).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeStatus {
    /// Whether the cheque has been redeemed.
    pub redeemed: bool,
    /// Whether the cheque has been revoked.
    pub revoked: bool,
    /// Signer of the last notified sign-over link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_payer: Option<Address>,
    /// Recipient of the last notified sign-over link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_payee: Option<Address>,
}

impl ChequeStatus {
    /// Redeemed or revoked; no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        self.redeemed || self.revoked
    }

    /// Whether a sign-over has been notified for this cheque.
    pub fn is_signed_over(&self) -> bool {
        self.latest_payee.is_some()
    }
}

/// Registry of cheque statuses keyed by payer, then cheque id.
///
/// Cheque ids are only unique per payer, so two payers may use the same id
/// without affecting each other. Entries are created lazily on first
/// interaction and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChequeRegistry {
    statuses: BTreeMap<Address, BTreeMap<ChequeId, ChequeStatus>>,
}

impl ChequeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `payer`'s cheque `id`, or the default for unseen cheques.
    pub fn status(&self, payer: &Address, id: &ChequeId) -> ChequeStatus {
        self.statuses
            .get(payer)
            .and_then(|cheques| cheques.get(id))
            .copied()
            .unwrap_or_default()
    }

    /// Whether the cheque has been redeemed.
    pub fn is_redeemed(&self, payer: &Address, id: &ChequeId) -> bool {
        self.status(payer, id).redeemed
    }

    /// Whether the cheque has been revoked.
    pub fn is_revoked(&self, payer: &Address, id: &ChequeId) -> bool {
        self.status(payer, id).revoked
    }

    /// Latest payer after sign-overs, if any were notified.
    pub fn latest_payer(&self, payer: &Address, id: &ChequeId) -> Option<Address> {
        self.status(payer, id).latest_payer
    }

    /// Latest payee after sign-overs, if any were notified.
    pub fn latest_payee(&self, payer: &Address, id: &ChequeId) -> Option<Address> {
        self.status(payer, id).latest_payee
    }

    /// Number of cheques the registry has seen.
    pub fn len(&self) -> usize {
        self.statuses.values().map(BTreeMap::len).sum()
    }

    /// Whether the registry has seen no cheques.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all tracked cheques as `(payer, id, status)`.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &ChequeId, &ChequeStatus)> {
        self.statuses
            .iter()
            .flat_map(|(payer, cheques)| cheques.iter().map(move |(id, status)| (payer, id, status)))
    }

    /// Mark the cheque redeemed. At most once.
    pub fn mark_redeemed(&mut self, payer: Address, id: ChequeId) -> Result<(), RegistryError> {
        let status = self.entry(payer, id);
        if status.redeemed {
            return Err(RegistryError::AlreadyRedeemed(id));
        }
        status.redeemed = true;
        trace!(%payer, %id, "cheque redeemed");
        Ok(())
    }

    /// Mark the cheque revoked. Not allowed once redeemed; permanent.
    pub fn mark_revoked(&mut self, payer: Address, id: ChequeId) -> Result<(), RegistryError> {
        let status = self.status(&payer, &id);
        if status.redeemed {
            return Err(RegistryError::AlreadyRedeemed(id));
        }
        if status.revoked {
            return Err(RegistryError::Revoked(id));
        }
        self.entry(payer, id).revoked = true;
        trace!(%payer, %id, "cheque revoked");
        Ok(())
    }

    /// Record the resolved holder transition of a validated sign-over chain.
    pub fn update_sign_over(
        &mut self,
        payer: Address,
        id: ChequeId,
        latest_payer: Address,
        latest_payee: Address,
    ) {
        let status = self.entry(payer, id);
        status.latest_payer = Some(latest_payer);
        status.latest_payee = Some(latest_payee);
        trace!(%payer, %id, %latest_payer, %latest_payee, "sign-over updated");
    }

    fn entry(&mut self, payer: Address, id: ChequeId) -> &mut ChequeStatus {
        self.statuses
            .entry(payer)
            .or_default()
            .entry(id)
            .or_default()
    }
}
