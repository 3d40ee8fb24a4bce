use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] arbiter_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] arbiter_store::StoreError),

    #[error("consensus error: {0}")]
    Consensus(#[from] arbiter_consensus::ConsensusError),

    #[error("network error: {0}")]
    Network(#[from] arbiter_network::NetworkError),

    #[error("message error: {0}")]
    Message(#[from] arbiter_messages::MessageError),

    #[error("signing error: {0}")]
    Signing(#[from] arbiter_transactions::AdmissionError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
