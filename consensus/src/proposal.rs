//! The payload of a vote.

use std::collections::BTreeSet;

use arbiter_types::TxId;
use serde::{Deserialize, Serialize};

use crate::ConsensusError;

/// Current proposal schema.
pub const PROPOSAL_VERSION: u32 = 1;

/// The ids a voter currently supports. Bodies travel separately, as gossip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub version: u32,
    pub round: u32,
    pub ids: Vec<TxId>,
}

impl Proposal {
    pub fn new(round: u32, ids: impl IntoIterator<Item = TxId>) -> Self {
        let ids: BTreeSet<TxId> = ids.into_iter().collect();
        Self {
            version: PROPOSAL_VERSION,
            round,
            ids: ids.into_iter().collect(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ConsensusError> {
        serde_json::to_vec(self).map_err(|e| ConsensusError::MalformedProposal(e.to_string()))
    }

    /// Parse a proposal, refusing schema versions this node does not speak.
    pub fn from_json(raw: &[u8]) -> Result<Self, ConsensusError> {
        let proposal: Self = serde_json::from_slice(raw)
            .map_err(|e| ConsensusError::MalformedProposal(e.to_string()))?;
        if proposal.version != PROPOSAL_VERSION {
            return Err(ConsensusError::UnsupportedProposal {
                found: proposal.version,
                expected: PROPOSAL_VERSION,
            });
        }
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sorted_and_unique() {
        let p = Proposal::new(2, [TxId::new([3; 32]), TxId::new([1; 32]), TxId::new([3; 32])]);
        assert_eq!(p.ids, vec![TxId::new([1; 32]), TxId::new([3; 32])]);
        assert_eq!(p.version, PROPOSAL_VERSION);
    }

    #[test]
    fn json_uses_hex_ids() {
        let p = Proposal::new(1, [TxId::new([0xab; 32])]);
        let json = String::from_utf8(p.to_json().unwrap()).unwrap();
        assert!(json.contains(&"ab".repeat(32)));
        assert_eq!(Proposal::from_json(json.as_bytes()).unwrap(), p);
    }

    #[test]
    fn unknown_versions_are_refused() {
        let raw = br#"{"version":2,"round":1,"ids":[]}"#;
        assert!(matches!(
            Proposal::from_json(raw),
            Err(ConsensusError::UnsupportedProposal { found: 2, .. })
        ));
        assert!(matches!(
            Proposal::from_json(b"not json"),
            Err(ConsensusError::MalformedProposal(_))
        ));
    }
}
