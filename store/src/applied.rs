//! Applied transaction index.

use arbiter_types::TxId;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// A transaction the ledger has applied.
///
/// Kept while a late duplicate could still validate, so the same id never
/// applies twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTx {
    pub id: TxId,
    /// Last ledger number at which the id could validate again; `None`
    /// keeps the entry for good.
    pub retain_until: Option<u64>,
}

impl AppliedTx {
    /// Whether the entry can be dropped once the ledger reaches `ledger_number`.
    pub fn expired_at(&self, ledger_number: u64) -> bool {
        self.retain_until.is_some_and(|last| last < ledger_number)
    }
}

pub trait AppliedStore {
    fn is_applied(&self, id: &TxId) -> Result<bool, StoreError>;

    /// All entries, in ascending id order.
    fn iter_applied(&self) -> Result<Vec<AppliedTx>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_ends_after_the_last_ledger() {
        let bounded = AppliedTx {
            id: TxId::new([1; 32]),
            retain_until: Some(5),
        };
        assert!(!bounded.expired_at(5));
        assert!(bounded.expired_at(6));

        let forever = AppliedTx {
            id: TxId::new([2; 32]),
            retain_until: None,
        };
        assert!(!forever.expired_at(u64::MAX));
    }
}
