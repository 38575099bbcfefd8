//! Per-trip broadcast rooms
//!
//! Each trip gets its own `tokio::sync::broadcast` channel. A room is created
//! when the first subscriber joins and pruned once nobody listens any more.

use crate::{message::Message, subscriber::Subscriber};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Registry of trip rooms
#[derive(Debug)]
pub struct Rooms {
    /// Broadcast sender per trip
    channels: RwLock<HashMap<Uuid, broadcast::Sender<Arc<Message>>>>,

    /// Buffered messages per room before slow subscribers lag
    capacity: usize,
}

impl Rooms {
    /// Create registry; `capacity` is clamped to at least 1
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Join a trip room, creating it if needed
    pub fn join(&self, trip_id: Uuid) -> Subscriber {
        let mut channels = self.channels.write();
        let sender = channels
            .entry(trip_id)
            .or_insert_with(|| {
                debug!(%trip_id, "Opening trip room");
                broadcast::channel(self.capacity).0
            });

        Subscriber::new(trip_id, sender.subscribe())
    }

    /// Send a message to its trip room
    ///
    /// Returns the number of subscribers reached; 0 when nobody joined.
    pub fn send(&self, message: Message) -> usize {
        let trip_id = message.trip_id;

        let delivered = {
            let channels = self.channels.read();
            match channels.get(&trip_id) {
                Some(sender) => sender.send(Arc::new(message)).unwrap_or(0),
                None => return 0,
            }
        };

        if delivered == 0 {
            self.prune(trip_id);
        }
        delivered
    }

    /// Close a trip room; subscribers drain what is buffered, then see `Closed`
    pub fn close(&self, trip_id: Uuid) -> bool {
        self.channels.write().remove(&trip_id).is_some()
    }

    /// Number of subscribers currently in a trip room
    pub fn subscriber_count(&self, trip_id: Uuid) -> usize {
        self.channels
            .read()
            .get(&trip_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }

    /// Number of open rooms
    pub fn room_count(&self) -> usize {
        self.channels.read().len()
    }

    fn prune(&self, trip_id: Uuid) {
        let mut channels = self.channels.write();
        if channels
            .get(&trip_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&trip_id);
            debug!(%trip_id, "Pruned empty trip room");
        }
    }
}

impl Default for Rooms {
    fn default() -> Self {
        Self::new(crate::publisher::PublisherConfig::default().channel_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripUpdate;

    #[test]
    fn test_send_without_room() {
        let rooms = Rooms::new(8);
        let delivered = rooms.send(Message::new(Uuid::now_v7(), TripUpdate::Members(vec![])));
        assert_eq!(delivered, 0);
        assert_eq!(rooms.room_count(), 0);
    }

    #[test]
    fn test_join_creates_room() {
        let rooms = Rooms::new(8);
        let trip_id = Uuid::now_v7();

        let _first = rooms.join(trip_id);
        let _second = rooms.join(trip_id);

        assert_eq!(rooms.room_count(), 1);
        assert_eq!(rooms.subscriber_count(trip_id), 2);
    }

    #[test]
    fn test_room_pruned_after_last_subscriber_leaves() {
        let rooms = Rooms::new(8);
        let trip_id = Uuid::now_v7();

        let subscriber = rooms.join(trip_id);
        drop(subscriber);

        let delivered = rooms.send(Message::new(trip_id, TripUpdate::Members(vec![])));
        assert_eq!(delivered, 0);
        assert_eq!(rooms.room_count(), 0);
    }

    #[test]
    fn test_close_room() {
        let rooms = Rooms::new(8);
        let trip_id = Uuid::now_v7();
        let _subscriber = rooms.join(trip_id);

        assert!(rooms.close(trip_id));
        assert!(!rooms.close(trip_id));
        assert_eq!(rooms.subscriber_count(trip_id), 0);
    }
}
