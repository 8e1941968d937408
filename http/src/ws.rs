//! WebSocket implementation of the seat feed.
//!
//! Connects to the service's per-trip feed at `/ws/trip/{trip_id}/` and maps
//! text frames into [`FeedMessage`]s. The connection is unauthenticated and
//! read-only; the adapter never reconnects on its own - a dropped
//! connection surfaces in-band as a [`FeedError`] and the stream ends.

use bilet_core::booking::TripId;
use bilet_core::feed::{FeedError, FeedMessage, FeedStream, SeatFeed};
use futures::StreamExt;
use std::future::Future;
use std::pin::Pin;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// [`SeatFeed`] over a WebSocket connection.
#[derive(Debug, Clone)]
pub struct WsSeatFeed {
    base_url: String,
}

impl WsSeatFeed {
    /// Create an adapter for the feed at `base_url`
    /// (e.g. `wss://bilet.example.com`, no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn feed_url(&self, trip_id: TripId) -> String {
        format!("{}/ws/trip/{trip_id}/", self.base_url)
    }
}

impl SeatFeed for WsSeatFeed {
    fn subscribe(
        &self,
        trip_id: TripId,
    ) -> Pin<Box<dyn Future<Output = Result<FeedStream, FeedError>> + Send + '_>> {
        let url = self.feed_url(trip_id);

        Box::pin(async move {
            tracing::debug!(%url, "Connecting to seat feed");

            let (socket, _response) = connect_async(url.as_str())
                .await
                .map_err(|error| FeedError::ConnectionFailed(error.to_string()))?;

            let stream = socket.filter_map(|frame| async move {
                match frame {
                    Ok(Message::Text(text)) => Some(
                        serde_json::from_str::<FeedMessage>(&text)
                            .map_err(|error| FeedError::Decode(error.to_string())),
                    ),
                    Ok(Message::Close(_)) => Some(Err(FeedError::ConnectionLost(
                        "closed by server".to_string(),
                    ))),
                    // Control frames carry no seat data
                    Ok(_) => None,
                    Err(error) => Some(Err(FeedError::ConnectionLost(error.to_string()))),
                }
            });

            Ok(Box::pin(stream) as FeedStream)
        })
    }
}
