//! Type definitions for message bus

use serde::{Deserialize, Serialize};
use trip_ledger::{Expense, MemberId, Settlement};

/// Message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Expense list changed
    ExpensesUpdated,
    /// Settlement list changed
    SettlementsUpdated,
    /// Member list changed
    MembersUpdated,
}

impl MessageType {
    /// Get subject prefix for this message type
    pub fn subject_prefix(&self) -> &'static str {
        match self {
            MessageType::ExpensesUpdated => "tripsplit.expenses",
            MessageType::SettlementsUpdated => "tripsplit.settlements",
            MessageType::MembersUpdated => "tripsplit.members",
        }
    }
}

/// Refreshed collection pushed to a trip room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum TripUpdate {
    /// Full expense list after the write
    Expenses(Vec<Expense>),
    /// Full settlement list after the write
    Settlements(Vec<Settlement>),
    /// Full member list after the write
    Members(Vec<MemberId>),
}

impl TripUpdate {
    /// Message type for this update
    pub fn message_type(&self) -> MessageType {
        match self {
            TripUpdate::Expenses(_) => MessageType::ExpensesUpdated,
            TripUpdate::Settlements(_) => MessageType::SettlementsUpdated,
            TripUpdate::Members(_) => MessageType::MembersUpdated,
        }
    }

    /// Number of items carried
    pub fn len(&self) -> usize {
        match self {
            TripUpdate::Expenses(items) => items.len(),
            TripUpdate::Settlements(items) => items.len(),
            TripUpdate::Members(items) => items.len(),
        }
    }

    /// Check if the refreshed collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
