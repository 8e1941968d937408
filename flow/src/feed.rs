//! Feed pump: drives push messages into the store.
//!
//! The pump owns the [`SeatFeed`] subscription for one trip and forwards
//! every delivery into the store as a [`BookingAction::Feed`] action. It is
//! deliberately dumb: no reconnection, no buffering. When the subscription
//! fails or ends, a single `FeedLost` event is forwarded and the pump stops -
//! what to do about a lost feed (reload, resubscribe) belongs to the
//! embedding UI, not this flow.
//!
//! The pump must be cancelled when the visitor navigates away, so the
//! subscription does not outlive the screen it belongs to.

use crate::actions::{BookingAction, FeedEvent};
use crate::BookingStore;
use bilet_core::booking::TripId;
use bilet_core::feed::SeatFeed;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Handle to a running feed pump.
///
/// Cancel it on teardown; dropping the handle without cancelling leaves the
/// pump running until the subscription ends.
#[derive(Debug)]
pub struct FeedPumpHandle {
    shutdown: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl FeedPumpHandle {
    /// Stop the pump and wait for it to finish.
    pub async fn cancel(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

/// Subscribe to the trip's seat feed and forward deliveries into the store.
///
/// Returns immediately; the subscription and forwarding run in a background
/// task until cancelled or until the feed ends.
#[must_use]
pub fn spawn_feed_pump(
    store: BookingStore,
    feed: Arc<dyn SeatFeed>,
    trip_id: TripId,
) -> FeedPumpHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run_pump(store, feed, trip_id, shutdown_rx));

    FeedPumpHandle {
        shutdown: shutdown_tx,
        task,
    }
}

async fn run_pump(
    store: BookingStore,
    feed: Arc<dyn SeatFeed>,
    trip_id: TripId,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut stream = match feed.subscribe(trip_id).await {
        Ok(stream) => stream,
        Err(error) => {
            tracing::warn!(%trip_id, %error, "Seat feed subscription failed");
            let _ = store
                .send(BookingAction::Feed(FeedEvent::Lost {
                    reason: error.to_string(),
                }))
                .await;
            return;
        },
    };

    tracing::debug!(%trip_id, "Seat feed subscribed");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!(%trip_id, "Feed pump cancelled");
                break;
            }
            item = stream.next() => match item {
                Some(Ok(message)) => {
                    let _ = store.send(BookingAction::Feed(FeedEvent::Message(message))).await;
                }
                Some(Err(error)) => {
                    tracing::warn!(%trip_id, %error, "Seat feed error");
                    let _ = store
                        .send(BookingAction::Feed(FeedEvent::Lost {
                            reason: error.to_string(),
                        }))
                        .await;
                    break;
                }
                None => {
                    tracing::warn!(%trip_id, "Seat feed ended");
                    let _ = store
                        .send(BookingAction::Feed(FeedEvent::Lost {
                            reason: "feed stream ended".to_string(),
                        }))
                        .await;
                    break;
                }
            }
        }
    }
}
