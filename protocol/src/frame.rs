//! Frame layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Largest header-plus-payload length the `u16` length field can carry.
pub const MAX_BODY_LEN: usize = u16::MAX as usize;

/// Largest payload a frame of any kind can carry. A broadcast payload above
/// this would not fit in the `Deliver` frame the relay wraps it in.
pub const MAX_PAYLOAD_LEN: usize = MAX_BODY_LEN - 4;

/// Session number the relay assigns to each connection. Not an account id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameKind {
    Broadcast = 1,
    Direct = 2,
    Deliver = 3,
    Welcome = 4,
}

impl TryFrom<u8> for FrameKind {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Broadcast),
            2 => Ok(Self::Direct),
            3 => Ok(Self::Deliver),
            4 => Ok(Self::Welcome),
            other => Err(ProtocolError::UnknownKind(other)),
        }
    }
}

/// One relay frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Node to relay: send to every other session.
    Broadcast(Vec<u8>),
    /// Node to relay: send to one session.
    Direct { target: SessionId, payload: Vec<u8> },
    /// Relay to node: a payload and the session it came from.
    Deliver { origin: SessionId, payload: Vec<u8> },
    /// Relay to node, once, right after connecting.
    Welcome { session: SessionId },
}

impl Frame {
    /// The opaque payload, if this kind carries one.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Broadcast(payload)
            | Self::Direct { payload, .. }
            | Self::Deliver { payload, .. } => Some(payload),
            Self::Welcome { .. } => None,
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            Self::Broadcast(_) => FrameKind::Broadcast,
            Self::Direct { .. } => FrameKind::Direct,
            Self::Deliver { .. } => FrameKind::Deliver,
            Self::Welcome { .. } => FrameKind::Welcome,
        }
    }

    /// Header and payload, without the kind and length prefix.
    fn body(&self) -> Vec<u8> {
        match self {
            Self::Broadcast(payload) => payload.clone(),
            Self::Direct {
                target: session,
                payload,
            }
            | Self::Deliver {
                origin: session,
                payload,
            } => {
                let mut body = Vec::with_capacity(4 + payload.len());
                body.extend_from_slice(&session.0.to_be_bytes());
                body.extend_from_slice(payload);
                body
            }
            Self::Welcome { session } => session.0.to_be_bytes().to_vec(),
        }
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let body = self.body();
        if body.len() > MAX_BODY_LEN {
            return Err(ProtocolError::FrameTooLarge {
                size: body.len(),
                max: MAX_BODY_LEN,
            });
        }
        let mut out = Vec::with_capacity(3 + body.len());
        out.push(self.kind() as u8);
        out.extend_from_slice(&(body.len() as u16).to_be_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Parse a frame from its kind byte and body.
    pub fn decode(kind: u8, body: &[u8]) -> Result<Self, ProtocolError> {
        let kind = FrameKind::try_from(kind)?;
        let session = || -> Result<SessionId, ProtocolError> {
            let header: [u8; 4] = body
                .get(..4)
                .and_then(|h| h.try_into().ok())
                .ok_or(ProtocolError::Truncated {
                    kind: kind as u8,
                    len: body.len(),
                })?;
            Ok(SessionId(u32::from_be_bytes(header)))
        };
        Ok(match kind {
            FrameKind::Broadcast => Self::Broadcast(body.to_vec()),
            FrameKind::Direct => Self::Direct {
                target: session()?,
                payload: body[4..].to_vec(),
            },
            FrameKind::Deliver => Self::Deliver {
                origin: session()?,
                payload: body[4..].to_vec(),
            },
            FrameKind::Welcome => Self::Welcome { session: session()? },
        })
    }
}
