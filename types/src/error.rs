//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for values that cross crate boundaries.
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid protocol parameters: {0}")]
    InvalidParams(String),
}
