//! Message envelope for trip rooms

use crate::types::{MessageType, TripUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message ID (UUIDv7 for ordering)
    pub id: Uuid,

    /// Trip whose room receives the message
    pub trip_id: Uuid,

    /// Refreshed collection
    pub update: TripUpdate,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Correlation ID (for tracing)
    pub correlation_id: Option<String>,
}

impl Message {
    /// Create new message
    pub fn new(trip_id: Uuid, update: TripUpdate) -> Self {
        Self {
            id: Uuid::now_v7(),
            trip_id,
            update,
            timestamp: Utc::now(),
            correlation_id: None,
        }
    }

    /// Set correlation ID
    pub fn with_correlation_id(mut self, correlation_id: String) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Message type derived from the update
    pub fn message_type(&self) -> MessageType {
        self.update.message_type()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Subject for this message, e.g. `tripsplit.expenses.<trip_id>`
    pub fn subject(&self) -> String {
        format!("{}.{}", self.message_type().subject_prefix(), self.trip_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_ledger::{MemberId, Settlement, SettlementStatus};

    #[test]
    fn test_message_creation() {
        let trip_id = Uuid::now_v7();
        let msg = Message::new(trip_id, TripUpdate::Members(vec![MemberId::new("a")]));

        assert_eq!(msg.message_type(), MessageType::MembersUpdated);
        assert_eq!(msg.update.len(), 1);
        assert!(msg.correlation_id.is_none());
    }

    #[test]
    fn test_message_subject() {
        let trip_id = Uuid::now_v7();
        let msg = Message::new(trip_id, TripUpdate::Expenses(vec![]));

        assert_eq!(msg.subject(), format!("tripsplit.expenses.{}", trip_id));
    }

    #[test]
    fn test_message_bytes() {
        let msg = Message::new(Uuid::now_v7(), TripUpdate::Settlements(vec![]))
            .with_correlation_id("req-42".to_string());

        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.id, msg.id);
        assert_eq!(decoded.update, msg.update);
        assert_eq!(decoded.correlation_id.as_deref(), Some("req-42"));

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["update"]["kind"], "settlements");
    }

    #[test]
    fn test_message_bytes_keep_amount_precision() {
        let amount: rust_decimal::Decimal = "98765432109876543.21".parse().unwrap();
        let settlement = Settlement {
            settlement_id: Uuid::now_v7(),
            from: MemberId::new("b"),
            to: MemberId::new("a"),
            amount,
            status: SettlementStatus::Pending,
            initiated_at: chrono::Utc::now(),
            confirmed_at: None,
        };
        let msg = Message::new(Uuid::now_v7(), TripUpdate::Settlements(vec![settlement]));

        let decoded = Message::from_bytes(&msg.to_bytes().unwrap()).unwrap();
        match decoded.update {
            TripUpdate::Settlements(items) => assert_eq!(items[0].amount, amount),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[test]
    fn test_message_from_garbage() {
        assert!(Message::from_bytes(b"not json").is_err());
    }
}
