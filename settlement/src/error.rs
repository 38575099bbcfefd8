//! Error types for settlement engine

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (validation, unknown expense/settlement)
    #[error("Ledger error: {0}")]
    Ledger(#[from] trip_ledger::Error),

    /// Trip not loaded in the engine
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    /// Trip already loaded in the engine
    #[error("Trip already exists: {0}")]
    TripExists(Uuid),

    /// Balances do not sum to zero (strict conservation only)
    #[error("Balances do not net to zero: off by {total}")]
    Imbalance {
        /// Sum of all balances
        total: Decimal,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
