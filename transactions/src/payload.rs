//! Payload structures carried inside a [`SignedStructure`](crate::SignedStructure).
//!
//! Field order is fixed by declaration, so the JSON a signer produces is
//! reproducible. Verification always runs over the payload string exactly
//! as received.

use arbiter_types::AccountId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AdmissionError;
use crate::signed::SignedStructure;

/// A structure that can travel as a signed payload.
pub trait Payload: Serialize + DeserializeOwned {
    /// The `name` recorded next to the payload.
    const NAME: &'static str;
}

/// Request types a voter accepts from clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    QueryState,
    PostInitiateEncounter,
    CloseEncounter,
}

impl RequestKind {
    pub fn from_name(name: &str) -> Result<Self, AdmissionError> {
        match name {
            QueryState::NAME => Ok(Self::QueryState),
            PostInitiateEncounter::NAME => Ok(Self::PostInitiateEncounter),
            CloseEncounter::NAME => Ok(Self::CloseEncounter),
            other => Err(AdmissionError::UnknownRequest(other.to_string())),
        }
    }
}

/// Ask a voter for the ledger row of `account`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub account: AccountId,
}

impl Payload for QueryState {
    const NAME: &'static str = "QueryState";
}

/// An encounter both players agreed to, posted for inclusion in the ledger.
///
/// `challenger_sign` is the challenger's signature over the original
/// invitation. It is carried for the players' benefit and not interpreted
/// by voters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInitiateEncounter {
    pub challenger: AccountId,
    pub defender: AccountId,
    pub begin_by: u64,
    pub end_by: u64,
    pub begin_at: u64,
    #[serde(default)]
    pub challenger_sign: String,
}

impl Payload for PostInitiateEncounter {
    const NAME: &'static str = "PostInitiateEncounter";
}

/// A finished game: the full transcript of signed moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseEncounter {
    pub challenger: AccountId,
    pub defender: AccountId,
    pub moves: Vec<SignedStructure>,
}

impl Payload for CloseEncounter {
    const NAME: &'static str = "CloseEncounter";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub prev: String,
    pub commitment: String,
}

impl Payload for Commitment {
    const NAME: &'static str = "Commitment";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub prev: String,
    pub secret: String,
    pub value: String,
}

impl Payload for Reveal {
    const NAME: &'static str = "Reveal";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub prev: String,
}

impl Payload for Resolution {
    const NAME: &'static str = "Resolution";
}

/// A voter's answer to [`QueryState`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub account: AccountId,
    pub stake: u64,
    pub skill: i64,
    pub in_encounter_with: Option<AccountId>,
    pub encounter_begin_at: Option<u64>,
    pub encounter_end_by: Option<u64>,
    pub partial_chain_length: u64,
}

impl Payload for AccountState {
    const NAME: &'static str = "AccountState";
}

/// A voter's answer when a query cannot be served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
}

impl Payload for ErrorReport {
    const NAME: &'static str = "Error";
}
