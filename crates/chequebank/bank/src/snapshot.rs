//! Serializable bank state.

use std::path::Path;

use alloy_primitives::Address;
use chequebank_ledger::{ChequeRegistry, Ledger};
use serde::{Deserialize, Serialize};

/// Errors loading or storing a [`BankSnapshot`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the state file failed.
    #[error("state file i/o: {0}")]
    Io(#[from] std::io::Error),

    /// State file is not a valid snapshot.
    #[error("state file encoding: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot belongs to another ledger instance.
    #[error("snapshot is for instance {found}, expected {expected}")]
    InstanceMismatch { expected: Address, found: Address },
}

/// Full state of a [`ChequeBank`](crate::ChequeBank) at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSnapshot {
    /// Ledger instance identity.
    pub instance: Address,
    /// Account balances.
    #[serde(default)]
    pub ledger: Ledger,
    /// Cheque statuses.
    #[serde(default)]
    pub cheques: ChequeRegistry,
}

impl BankSnapshot {
    /// Empty state for `instance`.
    pub fn new(instance: Address) -> Self {
        Self {
            instance,
            ..Default::default()
        }
    }

    /// Load a snapshot, or start empty if `path` does not exist.
    ///
    /// A snapshot recorded for another instance is rejected.
    pub fn load_or_new(path: &Path, instance: Address) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Ok(Self::new(instance));
        }
        let snapshot = Self::load(path)?;
        if snapshot.instance != instance {
            return Err(SnapshotError::InstanceMismatch {
                expected: instance,
                found: snapshot.instance,
            });
        }
        Ok(snapshot)
    }

    /// Read a snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the snapshot to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
