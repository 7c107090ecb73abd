use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Programming-contract violation — a derived score escaped its
    /// documented range. Signals a logic bug, never clamped away.
    #[error("Contract violation: {0}")]
    Contract(String),

    /// Embedding provider failure (transport, decode, timeout).
    /// Always recoverable: search falls back to keyword scoring.
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MemoryResult<T> = Result<T, MemoryError>;
