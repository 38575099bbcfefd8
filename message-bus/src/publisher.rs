//! Message publisher for trip rooms

use crate::{message::Message, rooms::Rooms, subscriber::Subscriber, types::TripUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Publisher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Buffered messages per room before slow subscribers lag
    pub channel_capacity: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

/// Message publisher
#[derive(Debug, Clone)]
pub struct Publisher {
    rooms: Arc<Rooms>,
}

impl Publisher {
    /// Create publisher with its own room registry
    pub fn new(config: PublisherConfig) -> Self {
        Self::with_rooms(Arc::new(Rooms::new(config.channel_capacity)))
    }

    /// Create publisher over an existing room registry
    pub fn with_rooms(rooms: Arc<Rooms>) -> Self {
        Self { rooms }
    }

    /// Shared room registry
    pub fn rooms(&self) -> Arc<Rooms> {
        self.rooms.clone()
    }

    /// Join a trip room
    pub fn subscribe(&self, trip_id: Uuid) -> Subscriber {
        self.rooms.join(trip_id)
    }

    /// Publish message; returns the number of subscribers reached
    pub fn publish(&self, message: Message) -> usize {
        let subject = message.subject();
        let items = message.update.len();
        let delivered = self.rooms.send(message);

        if delivered > 0 {
            info!(%subject, items, delivered, "Published trip update");
        } else {
            debug!(%subject, "No subscribers for trip update");
        }
        delivered
    }

    /// Wrap an update for `trip_id` and publish it
    pub fn publish_update(&self, trip_id: Uuid, update: TripUpdate) -> usize {
        self.publish(Message::new(trip_id, update))
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new(PublisherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_ledger::MemberId;

    #[tokio::test]
    async fn test_publish_reaches_room() {
        let publisher = Publisher::default();
        let trip_id = Uuid::now_v7();
        let mut subscriber = publisher.subscribe(trip_id);

        let delivered =
            publisher.publish_update(trip_id, TripUpdate::Members(vec![MemberId::new("a")]));
        assert_eq!(delivered, 1);

        let message = subscriber.recv().await.unwrap();
        assert_eq!(message.trip_id, trip_id);
        assert_eq!(message.update, TripUpdate::Members(vec![MemberId::new("a")]));
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let publisher = Publisher::default();
        let trip_a = Uuid::now_v7();
        let trip_b = Uuid::now_v7();
        let mut sub_a = publisher.subscribe(trip_a);
        let mut sub_b = publisher.subscribe(trip_b);

        publisher.publish_update(trip_b, TripUpdate::Expenses(vec![]));

        let message = sub_b.recv().await.unwrap();
        assert_eq!(message.trip_id, trip_b);
        assert!(sub_a.try_recv().is_none());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let publisher = Publisher::new(PublisherConfig {
            channel_capacity: 4,
        });
        assert_eq!(publisher.publish_update(Uuid::now_v7(), TripUpdate::Settlements(vec![])), 0);
    }
}
