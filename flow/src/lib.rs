//! Seat-selection and reservation flow.
//!
//! The visitor-facing state machine that takes a trip's seat map to a paid
//! ticket in four steps, with a time-boxed hold protecting each stage:
//!
//! ```text
//!                 seatTapped ──► select_seat
//!  ┌───────────────┐  held  ┌───────────────┐        ┌─────────┐        ┌──────────────┐
//!  │ SeatSelection │───────►│ PassengerInfo │───────►│ Payment │───────►│ Confirmation │
//!  └───────▲───────┘  back  └───────────────┘ create └─────────┘  pay   └──────────────┘
//!          │                                  reservation │
//!          │          hold expired / seat lost            │
//!          └──────────────────────────────────────────────┘
//! ```
//!
//! - A successful seat select starts a 5-minute hold; creating the
//!   reservation restarts it at 15 minutes for payment. The countdown
//!   reaching zero clears the hold, the draft, and the reservation and
//!   returns the visitor to seat selection.
//! - The seat map is a snapshot replaced wholesale by the live feed. If a
//!   snapshot reports the held seat taken by someone else before a
//!   reservation exists, the hold is treated as lost.
//! - One mutating service call may be in flight at a time; commands arriving
//!   meanwhile are ignored.
//!
//! # Key Insight
//!
//! The flow never mutates the authoritative seat inventory. It *requests*
//! mutations through the booking service and shows an optimistic local mark;
//! the authoritative statuses arrive later over the push feed as a full
//! replacement.
//!
//! # Usage
//!
//! ```
//! use bilet_core::booking::{SessionId, TripId};
//! use bilet_flow::{
//!     BookingAction, BookingEnvironment, BookingFlowReducer, BookingState, FlowConfig,
//! };
//! use bilet_runtime::Store;
//! use bilet_testing::{mocks::ScriptedBookingService, test_clock};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = BookingEnvironment::new(
//!     Arc::new(test_clock()),
//!     Arc::new(ScriptedBookingService::new()),
//!     SessionId::generate(),
//!     FlowConfig::default(),
//! );
//!
//! let trip_id = TripId::new(1);
//! let store = Store::new(
//!     BookingState::new(trip_id),
//!     BookingFlowReducer::new(),
//!     env,
//! );
//!
//! let _ = store
//!     .send(BookingAction::SeatTapped { seat_id: "3A".into() })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod environment;
pub mod feed;
pub mod inventory;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod timer;
pub mod types;

pub use actions::{BookingAction, FeedEvent};
pub use environment::BookingEnvironment;
pub use feed::{FeedPumpHandle, spawn_feed_pump};
pub use inventory::InventoryState;
pub use reducer::BookingFlowReducer;
pub use timer::{HoldKind, HoldTimer};
pub use types::{
    BookingError, BookingState, BookingStep, FlowConfig, Reservation, ReservationDraft,
};

/// Store type driving the booking flow.
pub type BookingStore = bilet_runtime::Store<
    BookingState,
    BookingAction,
    BookingEnvironment,
    BookingFlowReducer,
>;

/// Create a store for one trip's booking flow.
#[must_use]
pub fn booking_store(trip_id: bilet_core::booking::TripId, env: BookingEnvironment) -> BookingStore {
    bilet_runtime::Store::new(BookingState::new(trip_id), BookingFlowReducer::new(), env)
}
