//! Ed25519 signing of request, move and response messages.

use arbiter_types::{PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

/// Sign `message` with `private_key`. The same key and message always give
/// the same signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(SigningKey::from_bytes(&private_key.0).sign(message).to_bytes())
}

/// Whether `signature` is `public_key`'s signature of `message`.
///
/// Verification is strict: transaction ids are derived from signature
/// bytes, so at most one encoding of a signature may verify.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    VerifyingKey::from_bytes(&public_key.0)
        .is_ok_and(|key| key.verify_strict(message, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::tx_id_from_signature;
    use crate::keys::keypair_from_seed;

    #[test]
    fn resigning_a_request_keeps_its_transaction_id() {
        let challenger = keypair_from_seed(&[1u8; 32]);
        let defender = keypair_from_seed(&[2u8; 32]);
        let request = br#"{"challenger":"aa","defender":"bb","begin_by":3,"end_by":9}"#;

        let first = sign_message(request, &challenger.private);
        let again = sign_message(request, &challenger.private);
        let other = sign_message(request, &defender.private);
        assert_eq!(tx_id_from_signature(&first), tx_id_from_signature(&again));
        assert_ne!(tx_id_from_signature(&first), tx_id_from_signature(&other));
    }

    #[test]
    fn a_move_verifies_only_for_its_author_and_bytes() {
        let defender = keypair_from_seed(&[2u8; 32]);
        let challenger = keypair_from_seed(&[1u8; 32]);
        let commitment = br#"{"prev":"","commitment":"00ff"}"#;
        let sig = sign_message(commitment, &defender.private);

        assert!(verify_signature(commitment, &sig, &defender.public));
        assert!(!verify_signature(commitment, &sig, &challenger.public));
        assert!(!verify_signature(br#"{"prev":"","commitment":"00fe"}"#, &sig, &defender.public));
    }

    #[test]
    fn unusable_public_key_verifies_nothing() {
        let keys = keypair_from_seed(&[4u8; 32]);
        let sig = sign_message(b"QueryState", &keys.private);
        assert!(!verify_signature(b"QueryState", &sig, &PublicKey([0xFF; 32])));
    }
}
