//! Write batching: groups the writes of a ledger close into a single LMDB
//! write transaction.
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::RwTxn;

use arbiter_store::{AccountRecord, AppliedTx, LedgerRoot, StoreError};
use arbiter_types::{LedgerHash, TxId};

use crate::environment::LmdbEnvironment;
use crate::ledger_root::SINGLETON_KEY;
use crate::LmdbError;

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    /// Insert or overwrite an account row.
    pub fn put_account(&mut self, record: &AccountRecord) -> Result<(), StoreError> {
        let bytes = bincode::serialize(record).map_err(LmdbError::from)?;
        self.env
            .accounts_db
            .put(&mut self.txn, record.account_id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_root(&mut self, root: &LedgerRoot) -> Result<(), StoreError> {
        let bytes = bincode::serialize(root).map_err(LmdbError::from)?;
        self.env
            .ledger_root_db
            .put(&mut self.txn, SINGLETON_KEY, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_ledger_hash(&mut self, hash: &LedgerHash) -> Result<(), StoreError> {
        self.env
            .ledger_hash_db
            .put(&mut self.txn, SINGLETON_KEY, hash.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_applied(&mut self, entry: &AppliedTx) -> Result<(), StoreError> {
        let bytes = bincode::serialize(entry).map_err(LmdbError::from)?;
        self.env
            .applied_db
            .put(&mut self.txn, entry.id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Forget an applied id. Missing ids are not an error.
    pub fn delete_applied(&mut self, id: &TxId) -> Result<(), StoreError> {
        self.env
            .applied_db
            .delete(&mut self.txn, id.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Commit all batched operations. This is the only fsync of the batch.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
