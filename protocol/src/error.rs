use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown frame kind: {0}")]
    UnknownKind(u8),

    #[error("frame too large: {size} > {max}")]
    FrameTooLarge { size: usize, max: usize },

    #[error("frame of kind {kind} too short for its header: {len} bytes")]
    Truncated { kind: u8, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
