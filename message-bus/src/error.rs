//! Error types for message bus

use thiserror::Error;

/// Message bus error
#[derive(Debug, Error)]
pub enum Error {
    /// Subscriber fell behind and missed messages; it should refetch
    #[error("Subscriber lagged behind by {0} messages")]
    Lagged(u64),

    /// Room closed, no more messages will arrive
    #[error("Room closed")]
    Closed,

    /// Handler rejected a message
    #[error("Handler error: {0}")]
    Handler(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
