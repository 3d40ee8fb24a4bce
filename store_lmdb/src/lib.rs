//! LMDB storage backend for the Arbiter ledger.
//!
//! Implements the storage traits from `arbiter-store` using the `heed` LMDB
//! bindings. One environment per voter holds five databases: `accounts`,
//! `ledger_root`, `ledger_hash`, `applied` and `meta`.

pub mod account;
pub mod applied;
pub mod environment;
pub mod error;
pub mod ledger_root;
pub mod meta;
pub mod store;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use store::LmdbStore;
pub use write_batch::WriteBatch;
