//! Trip room message bus
//!
//! In-process pub/sub for live trip updates:
//! - One broadcast room per trip, created on first join
//! - Every write publishes the refreshed raw collection, never a delta
//! - At-least-once delivery to current subscribers, no cross-writer ordering
//! - Lagging subscribers are told to refetch instead of silently losing updates

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod message;
pub mod publisher;
pub mod rooms;
pub mod subscriber;
pub mod types;

pub use error::{Error, Result};
pub use message::Message;
pub use publisher::{Publisher, PublisherConfig};
pub use rooms::Rooms;
pub use subscriber::{MessageHandler, Subscriber};
pub use types::{MessageType, TripUpdate};
