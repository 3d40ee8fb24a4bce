//! The signature verification boundary.
//!
//! Admission and the node only see this trait. Production wiring uses
//! [`Ed25519Verifier`]; tests may substitute a double that accepts anything.

use arbiter_types::{PublicKey, Signature};

use crate::sign::verify_signature;

pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` is a valid signature of `message` by `public_key`.
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        verify_signature(message, signature, public_key)
    }
}
