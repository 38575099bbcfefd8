//! Settlement Engine
//!
//! Turns a trip's expense and settlement history into net balances and a
//! short list of suggested payments.
//!
//! # Architecture
//!
//! 1. **Balances**: fold expenses and applicable settlements into one signed
//!    balance per member (positive = owed money)
//! 2. **Netting**: greedily match the largest debtor against the largest
//!    creditor until every balance is within tolerance of zero
//! 3. **Outstanding**: drop suggestions that already have a settlement on
//!    record between the same pair
//!
//! Writes go through [`SettlementEngine`], which validates them against the
//! trip ledger and publishes the refreshed collections to the trip's room.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use settlement::{compute_balances, compute_settlement_plan, SettlementPolicy};
//! use trip_ledger::{split_equally, Currency, Expense, MemberId};
//!
//! let members = vec![MemberId::new("a"), MemberId::new("b"), MemberId::new("c")];
//! let expense = Expense {
//!     expense_id: uuid::Uuid::now_v7(),
//!     description: "Dinner".to_string(),
//!     amount: Decimal::from(300),
//!     paid_by: MemberId::new("a"),
//!     splits: split_equally(Decimal::from(300), &members, Currency::USD).unwrap(),
//!     date: chrono::Utc::now(),
//! };
//!
//! let balances =
//!     compute_balances(&members, &[expense], &[], SettlementPolicy::ConfirmedOnly).unwrap();
//! let plan = compute_settlement_plan(&balances);
//!
//! assert_eq!(plan.len(), 2);
//! assert!(plan.iter().all(|t| t.to == MemberId::new("a")));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balances;
pub mod config;
pub mod engine;
pub mod error;
pub mod netting;
pub mod types;

// Re-exports
pub use balances::{compute_balances, snapshot_balances};
pub use config::{Config, NettingConfig};
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use netting::{
    apply_plan, compute_settlement_plan, imbalance, outstanding_transfers, NettingEngine,
};
pub use types::*;
