//! Core types for settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use trip_ledger::{Currency, MemberId, SettlementStatus};
use uuid::Uuid;

/// Net balance per member (positive = is owed money, negative = owes money)
///
/// Ordered by member ID so every derived view is deterministic.
pub type BalanceMap = BTreeMap<MemberId, Decimal>;

/// Which settlement records reduce balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Every settlement applies, whatever its status
    AllSettlementsApply,
    /// Only confirmed settlements apply; pending ones are in-flight claims
    #[default]
    ConfirmedOnly,
}

impl SettlementPolicy {
    /// Check if a settlement with `status` affects balances
    pub fn applies(&self, status: SettlementStatus) -> bool {
        match self {
            SettlementPolicy::AllSettlementsApply => true,
            SettlementPolicy::ConfirmedOnly => status.is_confirmed(),
        }
    }

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementPolicy::AllSettlementsApply => "all_settlements_apply",
            SettlementPolicy::ConfirmedOnly => "confirmed_only",
        }
    }
}

impl FromStr for SettlementPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all_settlements_apply" | "all" => Ok(SettlementPolicy::AllSettlementsApply),
            "confirmed_only" | "confirmed" => Ok(SettlementPolicy::ConfirmedOnly),
            other => Err(crate::Error::Config(format!(
                "Unknown settlement policy: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SettlementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suggested payment in a settlement plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetTransfer {
    /// Member who pays (debtor)
    pub from: MemberId,

    /// Member who receives (creditor)
    pub to: MemberId,

    /// Amount to pay
    pub amount: Decimal,
}

/// Plan statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    /// Members with a balance entry
    pub member_count: usize,

    /// Members owing more than the tolerance
    pub debtor_count: usize,

    /// Members owed more than the tolerance
    pub creditor_count: usize,

    /// Transfers in the plan
    pub transfer_count: usize,

    /// Total amount moved by the plan
    pub total_transferred: Decimal,
}

/// Derived view of one trip: balances, plan and what is still to be paid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    /// Trip ID
    pub trip_id: Uuid,

    /// Trip currency
    pub currency: Currency,

    /// Policy used for settlements
    pub policy: SettlementPolicy,

    /// Net balance per member
    pub balances: BalanceMap,

    /// Suggested payments that zero every balance
    pub plan: Vec<NetTransfer>,

    /// Plan entries with no settlement recorded yet for the same pair
    pub outstanding: Vec<NetTransfer>,

    /// Sum of all balances; non-zero means inconsistent input
    pub imbalance: Decimal,

    /// Plan statistics
    pub stats: PlanStats,
}
