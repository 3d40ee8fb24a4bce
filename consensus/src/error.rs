use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("invalid consensus configuration: {0}")]
    InvalidConfig(#[from] arbiter_types::ArbiterError),

    #[error("ledger error: {0}")]
    Ledger(#[from] arbiter_ledger::LedgerError),

    #[error("proposal version {found} is not supported (expected {expected})")]
    UnsupportedProposal { found: u32, expected: u32 },

    #[error("malformed proposal: {0}")]
    MalformedProposal(String),
}
