//! Votes heard from other voters.

use std::collections::BTreeSet;

use arbiter_types::TxId;

/// The last proposal heard from one voter this epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    pub round: u32,
    pub ids: BTreeSet<TxId>,
}

/// The result of offering a vote to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote from this voter this epoch.
    Accepted,
    /// Replaced the voter's earlier vote.
    Replaced,
    /// Built on a different last closed ledger; ignored.
    Stale,
    /// Claims to come from this node; ignored.
    OwnVote,
}
