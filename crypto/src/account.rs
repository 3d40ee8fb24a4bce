//! Account id derivation.

use arbiter_types::{AccountId, PublicKey};

use crate::hash::blake2b_256;

/// The account id owned by `public_key`: hex of its Blake2b-256 digest.
pub fn derive_account_id(public_key: &PublicKey) -> AccountId {
    AccountId::from_digest(&blake2b_256(public_key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    #[test]
    fn derived_ids_are_stable_and_well_formed() {
        let kp = keypair_from_seed(&[7u8; 32]);
        let a = derive_account_id(&kp.public);
        let b = derive_account_id(&kp.public);
        assert_eq!(a, b);
        assert!(a.is_well_formed());
    }

    #[test]
    fn distinct_keys_give_distinct_ids() {
        let a = derive_account_id(&keypair_from_seed(&[1u8; 32]).public);
        let b = derive_account_id(&keypair_from_seed(&[2u8; 32]).public);
        assert_ne!(a, b);
    }
}
