//! LMDB implementation of LedgerRootStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use arbiter_store::{LedgerRoot, LedgerRootStore, StoreError};
use arbiter_types::LedgerHash;

use crate::LmdbError;

/// Key of the single row in `ledger_root` and `ledger_hash`.
pub(crate) const SINGLETON_KEY: &[u8] = b"current";

pub struct LmdbLedgerRootStore {
    pub(crate) env: Arc<Env>,
    pub(crate) ledger_root_db: Database<Bytes, Bytes>,
    pub(crate) ledger_hash_db: Database<Bytes, Bytes>,
}

impl LedgerRootStore for LmdbLedgerRootStore {
    fn get_root(&self) -> Result<Option<LedgerRoot>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .ledger_root_db
            .get(&rtxn, SINGLETON_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn get_ledger_hash(&self) -> Result<Option<LedgerHash>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .ledger_hash_db
            .get(&rtxn, SINGLETON_KEY)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let raw: [u8; 32] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption("ledger hash has unexpected byte length".into())
                })?;
                Ok(Some(LedgerHash::new(raw)))
            }
            None => Ok(None),
        }
    }
}
