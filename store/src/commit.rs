//! Atomic ledger commits.

use arbiter_types::{LedgerHash, TxId};

use crate::{AccountRecord, AppliedTx, LedgerRoot, StoreError};

/// Everything that changes when a ledger closes.
#[derive(Clone, Debug)]
pub struct LedgerChangeset {
    /// Rows to insert or overwrite.
    pub accounts: Vec<AccountRecord>,
    pub root: LedgerRoot,
    pub ledger_hash: LedgerHash,
    /// Newly applied transactions to remember.
    pub applied: Vec<AppliedTx>,
    /// Remembered transactions that can no longer validate.
    pub expired: Vec<TxId>,
}

pub trait LedgerCommit {
    /// Write the whole changeset in one storage transaction. Either every
    /// row, the root, the hash and the applied index changes land, or none do.
    fn commit(&self, changeset: &LedgerChangeset) -> Result<(), StoreError>;
}
