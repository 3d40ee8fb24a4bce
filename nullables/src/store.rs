//! Nullable store: thread-safe in-memory ledger backend for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use arbiter_store::{
    AccountRecord, AccountStore, AppliedStore, AppliedTx, LedgerChangeset, LedgerCommit,
    LedgerRoot, LedgerRootStore, StoreError,
};
use arbiter_types::{AccountId, LedgerHash, TxId};

/// An in-memory ledger backend.
///
/// Commits are atomic under a single lock. [`NullStore::fail_commits`]
/// makes every later commit fail, to exercise storage-failure paths.
#[derive(Default)]
pub struct NullStore {
    accounts: Mutex<BTreeMap<AccountId, AccountRecord>>,
    root: Mutex<Option<(LedgerRoot, LedgerHash)>>,
    applied: Mutex<BTreeMap<TxId, AppliedTx>>,
    failing: AtomicBool,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row directly, bypassing the ledger. Tests use this to build
    /// populations the single genesis account cannot express.
    pub fn insert_account(&self, record: AccountRecord) {
        self.accounts
            .lock()
            .unwrap()
            .insert(record.account_id.clone(), record);
    }

    pub fn fail_commits(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }
}

impl AccountStore for NullStore {
    fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }

    fn iter_accounts(&self) -> Result<Vec<AccountRecord>, StoreError> {
        Ok(self.accounts.lock().unwrap().values().cloned().collect())
    }
}

impl AppliedStore for NullStore {
    fn is_applied(&self, id: &TxId) -> Result<bool, StoreError> {
        Ok(self.applied.lock().unwrap().contains_key(id))
    }

    fn iter_applied(&self) -> Result<Vec<AppliedTx>, StoreError> {
        Ok(self.applied.lock().unwrap().values().copied().collect())
    }
}

impl LedgerRootStore for NullStore {
    fn get_root(&self) -> Result<Option<LedgerRoot>, StoreError> {
        Ok(self.root.lock().unwrap().map(|(root, _)| root))
    }

    fn get_ledger_hash(&self) -> Result<Option<LedgerHash>, StoreError> {
        Ok(self.root.lock().unwrap().map(|(_, hash)| hash))
    }
}

impl LedgerCommit for NullStore {
    fn commit(&self, changeset: &LedgerChangeset) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store is failing commits".into()));
        }
        let mut accounts = self.accounts.lock().unwrap();
        let mut root = self.root.lock().unwrap();
        let mut applied = self.applied.lock().unwrap();
        for record in &changeset.accounts {
            accounts.insert(record.account_id.clone(), record.clone());
        }
        for entry in &changeset.applied {
            applied.insert(entry.id, *entry);
        }
        for id in &changeset.expired {
            applied.remove(id);
        }
        *root = Some((changeset.root, changeset.ledger_hash));
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_commits_leave_state_untouched() {
        let store = NullStore::new();
        let id = AccountId::new("a".repeat(64));
        let changeset = LedgerChangeset {
            accounts: vec![AccountRecord::new(id.clone(), 10)],
            root: LedgerRoot {
                ledger_number: 1,
                state_hash: LedgerHash::ZERO,
                previous_hash: LedgerHash::ZERO,
                fees_collected: 0,
            },
            ledger_hash: LedgerHash::new([1; 32]),
            applied: vec![AppliedTx {
                id: TxId::new([2; 32]),
                retain_until: None,
            }],
            expired: Vec::new(),
        };
        store.fail_commits(true);
        assert!(store.commit(&changeset).is_err());
        assert!(store.get_account(&id).unwrap().is_none());
        assert!(!store.is_applied(&TxId::new([2; 32])).unwrap());

        store.fail_commits(false);
        store.commit(&changeset).unwrap();
        assert_eq!(store.get_account(&id).unwrap().unwrap().stake, 10);
        assert!(store.is_applied(&TxId::new([2; 32])).unwrap());
        assert_eq!(store.commit_count(), 1);
    }
}
