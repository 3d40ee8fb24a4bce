//! Nullable infrastructure for deterministic testing.
//!
//! In-memory stand-ins for the pieces of a voter that touch the outside
//! world: storage, the relay connection and signature checking. They never
//! touch the filesystem or the network and can be steered from tests.

pub mod network;
pub mod store;
pub mod verifier;

pub use network::{NullTransport, Sent};
pub use store::NullStore;
pub use verifier::AcceptAllVerifier;
