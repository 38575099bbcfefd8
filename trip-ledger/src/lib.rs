//! Tripsplit Trip Ledger
//!
//! Shared-expense records for a single trip: members, expenses with their
//! per-member splits, and settlement payments between members.
//!
//! # Architecture
//!
//! - **Snapshots**: every consumer reads an immutable [`TripSnapshot`]
//! - **Validated writes**: [`TripLedger`] checks amounts and splits before
//!   anything is recorded
//! - **Exact money**: all amounts are [`rust_decimal::Decimal`]
//!
//! # Invariants
//!
//! - Every recorded expense has splits summing to its amount (within 0.01)
//! - Expense and split amounts are never negative
//! - Settlement amounts are strictly positive and never self-directed

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod validation;
pub mod ledger;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    Currency, Expense, ExpenseUpdate, MemberId, NewExpense, NewSettlement, Settlement,
    SettlementStatus, SplitDetail, TripSnapshot,
};
pub use validation::{split_equally, validate_split, SPLIT_TOLERANCE};
pub use ledger::TripLedger;
pub use config::Config;
