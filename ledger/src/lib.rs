//! The Arbiter account ledger.
//!
//! A ledger is a set of account rows plus a root chaining it to its
//! predecessor. It changes only through [`Ledger::apply`], which every
//! voter runs over the same id-ordered transaction set, so honest voters
//! arrive at byte-identical state.

pub mod apportion;
pub mod error;
pub mod genesis;
pub mod ledger;
pub mod skill;
pub mod state_hash;
mod working_state;

pub use apportion::apportion;
pub use error::LedgerError;
pub use genesis::GenesisConfig;
pub use ledger::{ApplyReport, Ledger};
pub use skill::skill_delta;
pub use state_hash::compute_state_hash;
