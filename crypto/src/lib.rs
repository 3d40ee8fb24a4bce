//! Cryptographic primitives for Arbiter.
//!
//! - **Ed25519** for signing and signature verification
//! - **Blake2b** for hashing (ledger roots, state rows, transaction ids, commitments)
//! - Account id derivation from public keys

pub mod account;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod verifier;

pub use account::derive_account_id;
pub use hash::{blake2b_256, blake2b_256_multi, hash_ledger_root, tx_id_from_signature};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use verifier::{Ed25519Verifier, SignatureVerifier};
