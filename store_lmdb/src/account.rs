//! LMDB implementation of AccountStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use arbiter_store::{AccountRecord, AccountStore, StoreError};
use arbiter_types::AccountId;

use crate::LmdbError;

pub struct LmdbAccountStore {
    pub(crate) env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
}

impl AccountStore for LmdbAccountStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .accounts_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.accounts_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut rows = Vec::new();
        // Keys are ASCII hex, so LMDB's byte order is account id order.
        for entry in self.accounts_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_key, bytes) = entry.map_err(LmdbError::from)?;
            rows.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(rows)
    }
}
