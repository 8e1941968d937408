//! Push-channel abstraction for live seat-status updates.
//!
//! While a trip's seat map is on screen, the booking service pushes the full
//! seat list whenever any hold or reservation changes. Both message kinds
//! are full replacements - the snapshot is never patched incrementally,
//! which keeps the client and server views from diverging at the cost of
//! resending a few dozen seats per update.
//!
//! ```text
//! Booking service ──push──► SeatFeed subscription ──FeedMessage──► reducer
//!                                     │
//!                                     └── error / stream end ──► FeedLost
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//!
//! let mut stream = feed.subscribe(trip_id).await?;
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(message) => store.send(BookingAction::from(message)).await?,
//!         Err(e) => {
//!             tracing::warn!("Seat feed lost: {e}");
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! # Dyn Compatibility
//!
//! [`SeatFeed`] uses an explicit `Pin<Box<dyn Future>>` return instead of
//! `async fn` to enable trait object usage (`Arc<dyn SeatFeed>`).

use crate::booking::{Seat, TripId};
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors reported by the seat feed.
///
/// Any of these amounts to the `FeedLost` condition for the flow; what to do
/// about it (reload, resubscribe) is the embedding UI's decision.
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    /// The subscription could not be established
    #[error("Feed connection failed: {0}")]
    ConnectionFailed(String),

    /// An established subscription dropped
    #[error("Feed connection lost: {0}")]
    ConnectionLost(String),

    /// A pushed message could not be decoded
    #[error("Feed message malformed: {0}")]
    Decode(String),
}

/// A message pushed over the seat feed.
///
/// Tagged exactly as the wire carries it: `{"type": "initial_seats", ...}` or
/// `{"type": "seat_status_update", ...}`. Both kinds replace the snapshot
/// wholesale; the distinction only marks whether this is the greeting sent
/// on subscribe or a later update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Full seat list sent once when the subscription opens
    InitialSeats {
        /// The complete seat list for the trip
        seats: Vec<Seat>,
    },
    /// Full seat list sent after any hold or reservation change
    SeatStatusUpdate {
        /// The complete seat list for the trip
        seats: Vec<Seat>,
        /// Trip the update belongs to
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trip_id: Option<TripId>,
        /// Server-side time of the change
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
}

impl FeedMessage {
    /// The seat list carried by this message.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        match self {
            Self::InitialSeats { seats } | Self::SeatStatusUpdate { seats, .. } => seats,
        }
    }

    /// Consume the message, returning its seat list.
    #[must_use]
    pub fn into_seats(self) -> Vec<Seat> {
        match self {
            Self::InitialSeats { seats } | Self::SeatStatusUpdate { seats, .. } => seats,
        }
    }
}

/// Stream of messages from a feed subscription.
///
/// Each item is a `Result`: decode problems and connection loss arrive
/// in-band so the consumer can translate them into the `FeedLost` condition.
pub type FeedStream = Pin<Box<dyn Stream<Item = Result<FeedMessage, FeedError>> + Send>>;

/// Trait for seat feed implementations.
///
/// Production uses a WebSocket adapter; tests use a channel-backed
/// implementation that scripts push messages.
pub trait SeatFeed: Send + Sync {
    /// Subscribe to live seat updates for one trip.
    ///
    /// The returned stream yields an `initial_seats` message first, then a
    /// `seat_status_update` for every change until the connection ends.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ConnectionFailed`] when the subscription cannot
    /// be established.
    fn subscribe(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<FeedStream, FeedError>> + Send + '_>>;
}
