//! Core types for the trip ledger
//!
//! All types are designed for:
//! - Plain-data snapshots (serde, no references into storage)
//! - Exact arithmetic (Decimal for money)
//! - Opaque, comparable identifiers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Trip member identifier
///
/// Opaque token; ordering is only used to make derived views deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create new member ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// ISO 4217 currency code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Currency {
    /// US Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Indian Rupee
    INR,
    /// Japanese Yen
    JPY,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Number of decimal places in the minor unit
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Smallest representable amount (one minor unit)
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.minor_units())
    }

    /// Format an amount with the currency code, e.g. `USD 12.50`
    pub fn format(&self, amount: Decimal) -> String {
        format!("{} {}", self.code(), amount.round_dp(self.minor_units()))
    }
}

impl FromStr for Currency {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "INR" => Ok(Currency::INR),
            "JPY" => Ok(Currency::JPY),
            other => Err(crate::Error::Config(format!("Unknown currency: {}", other))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One member's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDetail {
    /// Member responsible for this share
    pub member: MemberId,

    /// Amount owed by the member
    pub owes: Decimal,
}

impl SplitDetail {
    /// Create new split share
    pub fn new(member: impl Into<MemberId>, owes: Decimal) -> Self {
        Self {
            member: member.into(),
            owes,
        }
    }
}

/// Recorded shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID (UUIDv7 for time-ordering)
    pub expense_id: Uuid,

    /// Free-text description
    pub description: String,

    /// Total amount paid
    pub amount: Decimal,

    /// Member who fronted the money
    pub paid_by: MemberId,

    /// Per-member shares
    pub splits: Vec<SplitDetail>,

    /// When the expense happened
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Sum of all owed shares
    pub fn split_total(&self) -> crate::Result<Decimal> {
        crate::validation::checked_sum("Split total", self.splits.iter().map(|s| s.owes))
    }
}

/// Expense as submitted, before an ID is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    /// Free-text description
    pub description: String,

    /// Total amount paid
    pub amount: Decimal,

    /// Member who fronted the money
    pub paid_by: MemberId,

    /// Per-member shares
    pub splits: Vec<SplitDetail>,

    /// When the expense happened (defaults to now)
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Partial expense update; `None` fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    /// New description
    #[serde(default)]
    pub description: Option<String>,

    /// New total amount
    #[serde(default)]
    pub amount: Option<Decimal>,

    /// New payer
    #[serde(default)]
    pub paid_by: Option<MemberId>,

    /// Replacement split shares
    #[serde(default)]
    pub splits: Option<Vec<SplitDetail>>,
}

/// Settlement status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Claimed by the payer, not yet acknowledged
    #[default]
    Pending,
    /// Acknowledged by the receiver
    Confirmed,
}

impl SettlementStatus {
    /// Check if confirmed
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SettlementStatus::Confirmed)
    }
}

/// Payment between two members that reduces outstanding balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID
    pub settlement_id: Uuid,

    /// Member paying
    pub from: MemberId,

    /// Member receiving
    pub to: MemberId,

    /// Amount paid
    pub amount: Decimal,

    /// Current status
    #[serde(default)]
    pub status: SettlementStatus,

    /// When the payment was recorded
    pub initiated_at: DateTime<Utc>,

    /// When the receiver confirmed it
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Settlement as submitted, before an ID is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSettlement {
    /// Member paying
    pub from: MemberId,

    /// Member receiving
    pub to: MemberId,

    /// Amount paid
    pub amount: Decimal,

    /// Initial status (pending unless the receiver records it)
    #[serde(default)]
    pub status: SettlementStatus,
}

/// Immutable view of one trip's shared-expense state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    /// Trip ID
    pub trip_id: Uuid,

    /// Trip currency
    #[serde(default)]
    pub currency: Currency,

    /// Declared members
    pub members: Vec<MemberId>,

    /// All expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// All settlement records, any status
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

impl TripSnapshot {
    /// Parse snapshot from JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize snapshot to pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
