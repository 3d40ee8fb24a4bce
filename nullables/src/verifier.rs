//! Nullable signature verification.

use arbiter_crypto::SignatureVerifier;
use arbiter_types::{PublicKey, Signature};

/// Accepts every signature. Lets tests feed hand-built structures through
/// admission without real keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAllVerifier;

impl SignatureVerifier for AcceptAllVerifier {
    fn verify(&self, _message: &[u8], _signature: &Signature, _public_key: &PublicKey) -> bool {
        true
    }
}
