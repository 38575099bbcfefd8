//! Error types for the trip ledger

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Negative or otherwise unusable amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Split shares do not add up to the expense amount
    #[error("Split mismatch: expected total {expected}, splits sum to {actual}")]
    SplitMismatch {
        /// Expense amount
        expected: Decimal,
        /// Sum of the owed amounts
        actual: Decimal,
    },

    /// Split requested over no members
    #[error("Cannot split an expense between zero members")]
    EmptySplit,

    /// Settlement from a member to themselves
    #[error("Settlement payer and receiver are the same member: {0}")]
    SelfSettlement(String),

    /// Expense not found
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),

    /// Settlement not found
    #[error("Settlement not found: {0}")]
    SettlementNotFound(Uuid),

    /// Settlement was already confirmed
    #[error("Settlement already confirmed: {0}")]
    AlreadyConfirmed(Uuid),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
