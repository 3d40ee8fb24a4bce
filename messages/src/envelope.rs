//! The wire envelope.

use arbiter_transactions::{CoinstakeSummary, SignedStructure};
use arbiter_types::{AccountId, LedgerHash};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::MessageError;

/// A relay payload, tagged by `event`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Envelope {
    /// A client's signed request, base64 of its JSON.
    ClientRequest { request: String },
    /// Traffic between voters.
    VoterMessage(VoterMessage),
}

/// Voter-to-voter traffic: a vote or relayed gossip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoterMessage {
    Vote {
        account_id: AccountId,
        /// Base64 of the JSON proposal.
        proposal: String,
        lcl_hash: LedgerHash,
    },
    Secondhand {
        /// Base64 of the JSON [`Secondhand`].
        secondhand: String,
    },
}

/// Gossip relayed on behalf of someone else.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Secondhand {
    /// A client request, re-verified by every receiver.
    Request(SignedStructure),
    /// A voter's fee claim.
    Coinstake(CoinstakeSummary),
}

/// A voter's answer to a client, signed with the voter's key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub result: SignedStructure,
}

impl Envelope {
    pub fn client_request(request: &SignedStructure) -> Result<Self, MessageError> {
        Ok(Self::ClientRequest {
            request: encode_b64_json(request)?,
        })
    }

    pub fn vote<P: Serialize>(
        account_id: AccountId,
        proposal: &P,
        lcl_hash: LedgerHash,
    ) -> Result<Self, MessageError> {
        Ok(Self::VoterMessage(VoterMessage::Vote {
            account_id,
            proposal: encode_b64_json(proposal)?,
            lcl_hash,
        }))
    }

    pub fn secondhand(gossip: &Secondhand) -> Result<Self, MessageError> {
        Ok(Self::VoterMessage(VoterMessage::Secondhand {
            secondhand: encode_b64_json(gossip)?,
        }))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, MessageError> {
        Ok(serde_json::from_slice(raw)?)
    }
}

impl ClientResponse {
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self, MessageError> {
        Ok(serde_json::from_slice(raw)?)
    }
}

/// Base64 (standard alphabet, padded) of the JSON encoding of `value`.
pub fn encode_b64_json<T: Serialize>(value: &T) -> Result<String, MessageError> {
    Ok(STANDARD.encode(serde_json::to_vec(value)?))
}

/// Inverse of [`encode_b64_json`].
pub fn decode_b64_json<T: DeserializeOwned>(encoded: &str) -> Result<T, MessageError> {
    let raw = STANDARD.decode(encoded)?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Base64-decode without parsing, for payloads parsed by their owner.
pub fn decode_b64(encoded: &str) -> Result<Vec<u8>, MessageError> {
    Ok(STANDARD.decode(encoded)?)
}
