use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid genesis configuration: {0}")]
    InvalidGenesis(String),

    #[error("ledger is corrupted: {0}")]
    Corrupted(String),

    #[error("storage error: {0}")]
    Store(#[from] arbiter_store::StoreError),
}
