//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use arbiter_store::StoreError;

use crate::account::LmdbAccountStore;
use crate::applied::LmdbAppliedStore;
use crate::ledger_root::LmdbLedgerRootStore;
use crate::meta::LmdbMetaStore;
use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// Number of named databases the environment holds.
const MAX_DBS: u32 = 5;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) accounts_db: Database<Bytes, Bytes>,
    pub(crate) ledger_root_db: Database<Bytes, Bytes>,
    pub(crate) ledger_hash_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) applied_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, creating the directory
    /// and any missing databases.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: each voter opens its environment exactly once per process
        // and never from two processes at the same path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let accounts_db = env.create_database(&mut wtxn, Some("accounts"))?;
        let ledger_root_db = env.create_database(&mut wtxn, Some("ledger_root"))?;
        let ledger_hash_db = env.create_database(&mut wtxn, Some("ledger_hash"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        let applied_db = env.create_database(&mut wtxn, Some("applied"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            accounts_db,
            ledger_root_db,
            ledger_hash_db,
            meta_db,
            applied_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn account_store(&self) -> LmdbAccountStore {
        LmdbAccountStore {
            env: Arc::clone(&self.env),
            accounts_db: self.accounts_db,
        }
    }

    pub fn ledger_root_store(&self) -> LmdbLedgerRootStore {
        LmdbLedgerRootStore {
            env: Arc::clone(&self.env),
            ledger_root_db: self.ledger_root_db,
            ledger_hash_db: self.ledger_hash_db,
        }
    }

    pub fn applied_store(&self) -> LmdbAppliedStore {
        LmdbAppliedStore {
            env: Arc::clone(&self.env),
            applied_db: self.applied_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }

    /// Begin a write batch; nothing is visible until it commits.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(self)
    }
}
