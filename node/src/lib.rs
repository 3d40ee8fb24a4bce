//! Arbiter voter node.
//!
//! A voter holds one ledger and takes part in consensus with the other
//! voters on the relay. The node:
//! - answers account queries straight from the ledger, signed with its key
//! - admits encounter transactions and floods them to other voters
//! - votes every round and closes a ledger at the end of each epoch
//!
//! All ledger and consensus mutation happens on the single task running
//! [`VoterNode::run`].

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::VoterNode;
pub use shutdown::ShutdownController;
