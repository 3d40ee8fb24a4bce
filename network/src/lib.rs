//! Networking for Arbiter voters.
//!
//! A central [`RelayServer`] stands in for a peer-to-peer overlay: every
//! connection becomes a session, and sessions can broadcast to all others
//! or address a single one. Voters reach the relay through a
//! [`RelayClient`], which the node only sees as a [`Transport`].

pub mod client;
pub mod error;
pub mod registry;
pub mod relay;
pub mod transport;

pub use arbiter_protocol::{SessionId, MAX_PAYLOAD_LEN};
pub use client::RelayClient;
pub use error::NetworkError;
pub use registry::SessionRegistry;
pub use relay::RelayServer;
pub use transport::{Inbound, Transport};
