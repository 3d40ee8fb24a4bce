//! Metadata storage trait.

use crate::StoreError;

/// Bookkeeping that does not belong to the ledger itself.
pub trait MetaStore {
    /// Current database schema version; 0 for a fresh database.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
