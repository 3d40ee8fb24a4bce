//! Relay wire protocol.
//!
//! Every frame is `kind: u8`, `len: u16` (big endian, counting the
//! kind-specific header and the payload), then the header and payload.
//! Payloads are opaque at this layer.

pub mod codec;
pub mod error;
pub mod frame;

pub use codec::{read_frame, write_frame};
pub use error::ProtocolError;
pub use frame::{Frame, FrameKind, SessionId, MAX_BODY_LEN, MAX_PAYLOAD_LEN};
