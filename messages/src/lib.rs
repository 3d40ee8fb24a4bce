//! Message types carried as relay payloads.
//!
//! Every payload is one JSON [`Envelope`]. Nested structures (signed
//! requests, proposals, secondhand gossip) travel as base64 of their own
//! JSON so the envelope never has to know their schema.

pub mod envelope;
pub mod error;

pub use envelope::{
    decode_b64, decode_b64_json, encode_b64_json, ClientResponse, Envelope, Secondhand, VoterMessage,
};
pub use error::MessageError;
