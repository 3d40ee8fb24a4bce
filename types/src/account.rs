//! Account identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ArbiterError;

/// An account identifier: the lowercase hex encoding of the Blake2b-256
/// digest of the account's public key.
///
/// Ordering is plain string ordering, which every node computes identically.
/// Construction never panics; use [`AccountId::is_well_formed`] to check the
/// fixed-length shape before trusting an id that arrived over the wire.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Length of a well-formed id in characters (32 bytes, hex encoded).
    pub const LEN: usize = 64;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build an id from a 32-byte public-key digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parse an id received from outside, rejecting malformed input.
    pub fn parse(raw: &str) -> Result<Self, ArbiterError> {
        let id = Self::new(raw);
        if id.is_well_formed() {
            Ok(id)
        } else {
            Err(ArbiterError::InvalidAccountId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id has the fixed length and lowercase-hex alphabet.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
