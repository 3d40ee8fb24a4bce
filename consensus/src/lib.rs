//! Consensus: agreeing on which transactions close the next ledger.
//!
//! Every epoch runs a fixed number of timer-driven rounds. Round 0 only
//! collects transactions. Each later round tallies the proposals heard from
//! other voters, weighting each voter by its stake in the last closed
//! ledger, and keeps the candidates whose support reaches that round's
//! threshold. The last round applies the survivors to the ledger and starts
//! the next epoch.
//!
//! ## Module overview
//!
//! - [`round`]: the [`ConsensusRound`] state machine.
//! - [`proposal`]: the versioned vote payload.
//! - [`vote`]: per-voter vote records and receipt outcomes.
//! - [`error`]: consensus error types.
//!
//! The state machine never touches the network: operations return
//! [`RoundAction`]s for the caller to carry out.

pub mod error;
pub mod proposal;
pub mod round;
pub mod vote;

pub use error::ConsensusError;
pub use proposal::{Proposal, PROPOSAL_VERSION};
pub use round::{ConsensusRound, RoundAction, RoundPhase};
pub use vote::{VoteOutcome, VoteRecord};

/// Fee, round thresholds and round duration, shared by every voter.
pub type ConsensusConfig = arbiter_types::ProtocolParams;
