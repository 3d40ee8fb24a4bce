use thiserror::Error;

/// Why a request was refused admission. Refused requests are dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("signature does not verify")]
    SignatureInvalid,

    #[error("unknown request type: {0}")]
    UnknownRequest(String),

    #[error("expected a {expected} structure, got {found}")]
    WrongStructure {
        expected: &'static str,
        found: String,
    },

    #[error("an account cannot challenge itself")]
    SelfChallenge,

    #[error("begin_by {begin_by} is after end_by {end_by}")]
    InvalidWindow { begin_by: u64, end_by: u64 },

    #[error("request is not signed by a participant")]
    NotAParticipant,

    #[error("transcript has {count} moves, expected {expected}")]
    MoveCount { count: usize, expected: usize },

    #[error("move #{index} is not signed by the {expected}")]
    WrongSigner { index: usize, expected: &'static str },

    #[error("move #{index} does not carry the previous move's signature")]
    ChainLinkage { index: usize },

    #[error("move #{index} should be {expected}")]
    UnexpectedMove { index: usize, expected: &'static str },

    #[error("reveal #{index} does not open its commitment")]
    CommitmentMismatch { index: usize },

    #[error("move #{index} reveals an unknown hand")]
    InvalidHand { index: usize },
}

impl From<serde_json::Error> for AdmissionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
