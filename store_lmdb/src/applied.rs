//! LMDB implementation of AppliedStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use arbiter_store::{AppliedStore, AppliedTx, StoreError};
use arbiter_types::TxId;

use crate::LmdbError;

pub struct LmdbAppliedStore {
    pub(crate) env: Arc<Env>,
    pub(crate) applied_db: Database<Bytes, Bytes>,
}

impl AppliedStore for LmdbAppliedStore {
    fn is_applied(&self, id: &TxId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .applied_db
            .get(&rtxn, id.as_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn iter_applied(&self) -> Result<Vec<AppliedTx>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut rows = Vec::new();
        for entry in self.applied_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, bytes) = entry.map_err(LmdbError::from)?;
            rows.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(rows)
    }
}
