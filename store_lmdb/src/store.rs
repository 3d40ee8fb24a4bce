//! The backend a voter's ledger runs on.

use std::path::Path;

use arbiter_store::{
    AccountRecord, AccountStore, AppliedStore, AppliedTx, LedgerChangeset, LedgerCommit,
    LedgerRoot, LedgerRootStore, MetaStore, StoreError,
};
use arbiter_types::{AccountId, LedgerHash, TxId};

use crate::account::LmdbAccountStore;
use crate::applied::LmdbAppliedStore;
use crate::environment::LmdbEnvironment;
use crate::ledger_root::LmdbLedgerRootStore;
use crate::meta::LmdbMetaStore;

/// Layout version written on first open.
pub const SCHEMA_VERSION: u32 = 2;

/// All five databases behind the store traits.
pub struct LmdbStore {
    env: LmdbEnvironment,
    accounts: LmdbAccountStore,
    roots: LmdbLedgerRootStore,
    applied: LmdbAppliedStore,
    meta: LmdbMetaStore,
}

impl LmdbStore {
    /// Open the environment at `path`, stamping the schema version on a
    /// fresh database and refusing one written by a newer layout.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        let env = LmdbEnvironment::open(path, map_size)?;
        let store = Self {
            accounts: env.account_store(),
            roots: env.ledger_root_store(),
            applied: env.applied_store(),
            meta: env.meta_store(),
            env,
        };
        match store.meta.get_schema_version()? {
            0 => store.meta.set_schema_version(SCHEMA_VERSION)?,
            SCHEMA_VERSION => {}
            other => {
                return Err(StoreError::Corruption(format!(
                    "schema version {other} is newer than supported {SCHEMA_VERSION}"
                )))
            }
        }
        Ok(store)
    }

    pub fn environment(&self) -> &LmdbEnvironment {
        &self.env
    }
}

impl AccountStore for LmdbStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        self.accounts.get_account(id)
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        self.accounts.account_count()
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        self.accounts.iter_accounts()
    }
}

impl AppliedStore for LmdbStore {
    fn is_applied(&self, id: &TxId) -> Result<bool, StoreError> {
        self.applied.is_applied(id)
    }

    fn iter_applied(&self) -> Result<Vec<AppliedTx>, StoreError> {
        self.applied.iter_applied()
    }
}

impl LedgerRootStore for LmdbStore {
    fn get_root(&self) -> Result<Option<LedgerRoot>, StoreError> {
        self.roots.get_root()
    }

    fn get_ledger_hash(&self) -> Result<Option<LedgerHash>, StoreError> {
        self.roots.get_ledger_hash()
    }
}

impl LedgerCommit for LmdbStore {
    fn commit(&self, changeset: &LedgerChangeset) -> Result<(), StoreError> {
        let mut batch = self.env.write_batch()?;
        for record in &changeset.accounts {
            batch.put_account(record)?;
        }
        batch.put_root(&changeset.root)?;
        batch.put_ledger_hash(&changeset.ledger_hash)?;
        for entry in &changeset.applied {
            batch.put_applied(entry)?;
        }
        for id in &changeset.expired {
            batch.delete_applied(id)?;
        }
        batch.commit()?;
        tracing::trace!(
            ledger_number = changeset.root.ledger_number,
            rows = changeset.accounts.len(),
            applied = changeset.applied.len(),
            expired = changeset.expired.len(),
            "ledger changeset committed"
        );
        Ok(())
    }
}
