//! Trip room subscriber

use crate::{message::Message, Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Message handler trait
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle incoming message
    async fn handle(&self, message: Arc<Message>) -> Result<()>;

    /// Called after the subscriber missed `skipped` messages; refetch state here
    async fn lagged(&self, trip_id: Uuid, skipped: u64) {
        warn!(%trip_id, skipped, "Subscriber lagged, state should be refetched");
    }
}

/// Subscriber to a single trip room
#[derive(Debug)]
pub struct Subscriber {
    trip_id: Uuid,
    receiver: broadcast::Receiver<Arc<Message>>,
}

impl Subscriber {
    pub(crate) fn new(trip_id: Uuid, receiver: broadcast::Receiver<Arc<Message>>) -> Self {
        Self { trip_id, receiver }
    }

    /// Trip this subscriber listens to
    pub fn trip_id(&self) -> Uuid {
        self.trip_id
    }

    /// Wait for the next message
    ///
    /// Returns [`Error::Lagged`] when messages were dropped because this
    /// subscriber fell behind, and [`Error::Closed`] once the room is gone.
    pub async fn recv(&mut self) -> Result<Arc<Message>> {
        match self.receiver.recv().await {
            Ok(message) => Ok(message),
            Err(RecvError::Lagged(skipped)) => Err(Error::Lagged(skipped)),
            Err(RecvError::Closed) => Err(Error::Closed),
        }
    }

    /// Next buffered message, if any, without waiting
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(trip_id = %self.trip_id, skipped, "Subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Feed every message to `handler` until the room closes
    pub async fn run<H>(mut self, handler: Arc<H>) -> Result<()>
    where
        H: MessageHandler + 'static,
    {
        info!(trip_id = %self.trip_id, "Listening to trip room");

        loop {
            match self.recv().await {
                Ok(message) => {
                    if let Err(e) = handler.handle(message.clone()).await {
                        error!("Error handling message {}: {}", message.id, e);
                    }
                }
                Err(Error::Lagged(skipped)) => handler.lagged(self.trip_id, skipped).await,
                Err(Error::Closed) => {
                    info!(trip_id = %self.trip_id, "Trip room closed");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rooms::Rooms, types::TripUpdate};
    use parking_lot::Mutex;
    use trip_ledger::MemberId;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<usize>>,
        lagged: Mutex<u64>,
    }

    #[async_trait]
    impl MessageHandler for Recorder {
        async fn handle(&self, message: Arc<Message>) -> Result<()> {
            self.seen.lock().push(message.update.len());
            Ok(())
        }

        async fn lagged(&self, _trip_id: Uuid, skipped: u64) {
            *self.lagged.lock() += skipped;
        }
    }

    fn members(count: usize) -> TripUpdate {
        TripUpdate::Members((0..count).map(|i| MemberId::new(format!("m{}", i))).collect())
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_told() {
        let rooms = Rooms::new(2);
        let trip_id = Uuid::now_v7();
        let mut subscriber = rooms.join(trip_id);

        for i in 0..5 {
            rooms.send(Message::new(trip_id, members(i)));
        }

        assert!(matches!(subscriber.recv().await, Err(Error::Lagged(3))));
        // Newest messages are still buffered
        assert_eq!(subscriber.recv().await.unwrap().update.len(), 3);
        assert_eq!(subscriber.recv().await.unwrap().update.len(), 4);
    }

    #[tokio::test]
    async fn test_closed_room() {
        let rooms = Rooms::new(4);
        let trip_id = Uuid::now_v7();
        let mut subscriber = rooms.join(trip_id);

        rooms.send(Message::new(trip_id, members(1)));
        rooms.close(trip_id);

        assert!(subscriber.recv().await.is_ok());
        assert!(matches!(subscriber.recv().await, Err(Error::Closed)));
    }

    #[tokio::test]
    async fn test_run_until_closed() {
        let rooms = Rooms::new(2);
        let trip_id = Uuid::now_v7();
        let subscriber = rooms.join(trip_id);
        assert_eq!(subscriber.trip_id(), trip_id);

        for i in 0..4 {
            rooms.send(Message::new(trip_id, members(i)));
        }
        rooms.close(trip_id);

        let recorder = Arc::new(Recorder::default());
        subscriber.run(recorder.clone()).await.unwrap();

        assert_eq!(*recorder.seen.lock(), vec![2, 3]);
        assert_eq!(*recorder.lagged.lock(), 2);
    }
}
