//! Abstract storage traits for the Arbiter ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger depends only on the traits.

pub mod account;
pub mod applied;
pub mod commit;
pub mod error;
pub mod ledger_root;
pub mod meta;

pub use account::{AccountRecord, AccountStore};
pub use applied::{AppliedStore, AppliedTx};
pub use commit::{LedgerChangeset, LedgerCommit};
pub use error::StoreError;
pub use ledger_root::{LedgerRoot, LedgerRootStore};
pub use meta::MetaStore;

/// Everything the ledger needs from a backend.
pub trait LedgerBackend:
    AccountStore + AppliedStore + LedgerRootStore + LedgerCommit + Send + Sync
{
}

impl<T> LedgerBackend for T where
    T: AccountStore + AppliedStore + LedgerRootStore + LedgerCommit + Send + Sync
{
}
