//! Fundamental types for the Arbiter ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identifiers, 32-byte hashes, key material and protocol parameters.

pub mod account;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;

pub use account::AccountId;
pub use error::ArbiterError;
pub use hash::{LedgerHash, TxId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::ProtocolParams;
