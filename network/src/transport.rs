//! The seam between a voter and whatever carries its messages.

use arbiter_protocol::SessionId;

use crate::NetworkError;

/// A payload delivered to this node, tagged with the sending session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inbound {
    pub origin: SessionId,
    pub payload: Vec<u8>,
}

/// Outbound half of a connection. Sends queue and return immediately;
/// per-destination order is preserved.
pub trait Transport: Send {
    /// The session this node was assigned.
    fn session(&self) -> SessionId;

    /// Deliver `payload` to every other session.
    fn broadcast(&self, payload: Vec<u8>) -> Result<(), NetworkError>;

    /// Deliver `payload` to `target` only.
    fn send_to(&self, target: SessionId, payload: Vec<u8>) -> Result<(), NetworkError>;
}
