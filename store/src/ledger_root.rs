//! Ledger root storage trait.

use arbiter_types::LedgerHash;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The single root describing the last closed ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRoot {
    pub ledger_number: u64,
    /// Rolling hash over every account row in id order.
    pub state_hash: LedgerHash,
    /// Hash of the ledger this one replaced; zero at genesis.
    pub previous_hash: LedgerHash,
    /// Fees debited by the close that produced this ledger. Coinstakes
    /// targeting the previous ledger number cannot pay out more.
    pub fees_collected: u64,
}

pub trait LedgerRootStore {
    fn get_root(&self) -> Result<Option<LedgerRoot>, StoreError>;

    fn get_ledger_hash(&self) -> Result<Option<LedgerHash>, StoreError>;
}
