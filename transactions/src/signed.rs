//! The signed envelope every request, move and response travels in.

use arbiter_crypto::{derive_account_id, sign_message, SignatureVerifier};
use arbiter_types::{AccountId, KeyPair, PublicKey, Signature};
use serde::{Deserialize, Serialize};

use crate::error::AdmissionError;
use crate::payload::Payload;

/// `payload` is a JSON string; the signature covers `name`, a zero byte and
/// the payload byte for byte, so a signed value cannot be relabelled.
/// `signature` and `public_key` are lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedStructure {
    pub name: String,
    pub payload: String,
    pub signature: String,
    pub public_key: String,
}

impl SignedStructure {
    /// Serialize `payload` and sign it with `keys`.
    pub fn sign<P: Payload>(payload: &P, keys: &KeyPair) -> Result<Self, AdmissionError> {
        let payload = serde_json::to_string(payload)?;
        let signature = sign_message(&signed_message(P::NAME, &payload), &keys.private);
        Ok(Self {
            name: P::NAME.to_string(),
            payload,
            signature: signature.to_hex(),
            public_key: keys.public.to_hex(),
        })
    }

    /// Decode the payload, insisting that `name` matches `P`.
    pub fn decode<P: Payload>(&self) -> Result<P, AdmissionError> {
        if self.name != P::NAME {
            return Err(AdmissionError::WrongStructure {
                expected: P::NAME,
                found: self.name.clone(),
            });
        }
        Ok(serde_json::from_str(&self.payload)?)
    }

    pub fn signature_bytes(&self) -> Result<Signature, AdmissionError> {
        Signature::from_hex(&self.signature)
            .ok_or_else(|| AdmissionError::Malformed("signature is not 64 hex bytes".into()))
    }

    pub fn public_key(&self) -> Result<PublicKey, AdmissionError> {
        PublicKey::from_hex(&self.public_key)
            .ok_or_else(|| AdmissionError::Malformed("public key is not 32 hex bytes".into()))
    }

    /// Check the signature and return the account id of the signer.
    pub fn verify(&self, verifier: &dyn SignatureVerifier) -> Result<AccountId, AdmissionError> {
        let public_key = self.public_key()?;
        let signature = self.signature_bytes()?;
        let message = signed_message(&self.name, &self.payload);
        if !verifier.verify(&message, &signature, &public_key) {
            return Err(AdmissionError::SignatureInvalid);
        }
        Ok(derive_account_id(&public_key))
    }

    pub fn to_json(&self) -> Result<String, AdmissionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &[u8]) -> Result<Self, AdmissionError> {
        Ok(serde_json::from_slice(raw)?)
    }
}

fn signed_message(name: &str, payload: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(name.len() + 1 + payload.len());
    message.extend_from_slice(name.as_bytes());
    message.push(0);
    message.extend_from_slice(payload.as_bytes());
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{QueryState, Resolution};
    use arbiter_crypto::{keypair_from_seed, Ed25519Verifier};

    #[test]
    fn signed_query_verifies_to_its_signer() {
        let keys = keypair_from_seed(&[5u8; 32]);
        let me = derive_account_id(&keys.public);
        let signed = SignedStructure::sign(&QueryState { account: me.clone() }, &keys).unwrap();
        assert_eq!(signed.name, "QueryState");
        assert_eq!(signed.verify(&Ed25519Verifier).unwrap(), me);
        assert_eq!(signed.decode::<QueryState>().unwrap().account, me);
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let keys = keypair_from_seed(&[5u8; 32]);
        let mut signed = SignedStructure::sign(
            &QueryState {
                account: AccountId::new("a".repeat(64)),
            },
            &keys,
        )
        .unwrap();
        signed.payload = signed.payload.replace('a', "b");
        assert_eq!(
            signed.verify(&Ed25519Verifier),
            Err(AdmissionError::SignatureInvalid)
        );
    }

    #[test]
    fn relabelled_structure_fails_verification() {
        let keys = keypair_from_seed(&[5u8; 32]);
        // Commitment and Resolution payloads both start with `prev`.
        let mut signed = SignedStructure::sign(&Resolution { prev: "00".into() }, &keys).unwrap();
        signed.name = "Commitment".into();
        assert_eq!(
            signed.verify(&Ed25519Verifier),
            Err(AdmissionError::SignatureInvalid)
        );
    }

    #[test]
    fn decode_rejects_wrong_name() {
        let keys = keypair_from_seed(&[5u8; 32]);
        let signed = SignedStructure::sign(&Resolution { prev: "00".into() }, &keys).unwrap();
        assert!(matches!(
            signed.decode::<QueryState>(),
            Err(AdmissionError::WrongStructure { .. })
        ));
    }

    #[test]
    fn garbage_hex_is_malformed() {
        let signed = SignedStructure {
            name: "QueryState".into(),
            payload: "{}".into(),
            signature: "zz".into(),
            public_key: "00".into(),
        };
        assert!(matches!(
            signed.verify(&Ed25519Verifier),
            Err(AdmissionError::Malformed(_))
        ));
    }
}
