use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("disconnected from relay")]
    Disconnected,

    #[error("outbound queue full")]
    QueueFull,

    #[error("payload too large: {size} > {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("unexpected frame: {0}")]
    UnexpectedFrame(&'static str),

    #[error("protocol error: {0}")]
    Protocol(#[from] arbiter_protocol::ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
