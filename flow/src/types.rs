//! Core types for the reservation flow.

use crate::inventory::InventoryState;
use crate::timer::HoldTimer;
use bilet_core::booking::{PassengerInfo, ReservationId, SeatId, SessionId, TripId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The step of the flow the visitor is currently on.
///
/// `Confirmation` is the success sink; there is no in-process terminal state,
/// since the visitor can always navigate home (see
/// [`BookingAction::Abandon`](crate::actions::BookingAction::Abandon)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStep {
    /// Choosing a seat on the seat map
    #[default]
    SeatSelection,
    /// Entering passenger details
    PassengerInfo,
    /// Entering card details
    Payment,
    /// Payment succeeded; ticket details on display
    Confirmation,
}

/// Errors surfaced to the visitor by the flow.
///
/// Every variant is recoverable: the flow returns to a well-defined step and
/// the message is shown as a transient, dismissible banner, never a crash.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingError {
    /// The seat was taken by another session before the hold could be placed,
    /// or an existing hold was lost to another session
    #[error("Seat is no longer available")]
    SeatUnavailable,

    /// A required form field is empty
    #[error("Required field is missing: {field}")]
    ValidationIncomplete {
        /// Name of the first empty required field
        field: String,
    },

    /// A service call could not complete
    #[error("Connection error: {reason}")]
    NetworkFailure {
        /// Transport-level failure description
        reason: String,
    },

    /// The service declined the payment
    #[error("Payment declined: {reason}")]
    PaymentDeclined {
        /// Decline reason reported by the service
        reason: String,
    },

    /// The hold countdown reached zero before checkout completed
    #[error("Time expired, please select a seat again")]
    HoldExpired,

    /// The live seat feed dropped; the seat map may be stale
    #[error("Live seat updates lost")]
    FeedLost,
}

/// Draft of a reservation, created the moment a seat hold succeeds.
///
/// Correlates the hold, release, and reservation calls for one attempt.
/// Discarded on release, hold expiry, divergence loss, or successful payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// Trip being booked
    pub trip_id: TripId,
    /// Seat held for this draft
    pub seat_id: SeatId,
    /// Session correlating the service calls
    pub session_id: SessionId,
    /// Passenger details, filled in at the passenger-info step
    pub passenger: PassengerInfo,
}

/// A reservation created by the booking service.
///
/// Kept for display after successful payment; discarded on expiry or
/// navigation away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Service-assigned id
    pub id: ReservationId,
    /// Total price for display, as the wire carries it (e.g. `"150.00"`)
    pub total_price: String,
    /// When the pending reservation lapses unless paid
    pub expires_at: DateTime<Utc>,
}

/// Hold durations for the flow, in whole seconds.
///
/// The defaults mirror the booking service's lock TTLs: a seat hold lives
/// five minutes, a pending reservation fifteen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Seconds a seat hold lasts before the seat is released
    pub seat_hold_seconds: u32,
    /// Seconds a pending reservation lasts before it expires
    pub payment_hold_seconds: u32,
}

impl FlowConfig {
    /// Create a config with explicit hold durations.
    #[must_use]
    pub const fn new(seat_hold_seconds: u32, payment_hold_seconds: u32) -> Self {
        Self {
            seat_hold_seconds,
            payment_hold_seconds,
        }
    }

    /// Set the seat-hold duration.
    #[must_use]
    pub const fn with_seat_hold_seconds(mut self, seconds: u32) -> Self {
        self.seat_hold_seconds = seconds;
        self
    }

    /// Set the payment-hold duration.
    #[must_use]
    pub const fn with_payment_hold_seconds(mut self, seconds: u32) -> Self {
        self.payment_hold_seconds = seconds;
        self
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            seat_hold_seconds: 300,
            payment_hold_seconds: 900,
        }
    }
}

/// State of the reservation flow for one trip.
///
/// Owned exclusively by the flow reducer; the rendering layer reads it
/// through the store. The inventory snapshot inside is only written by the
/// feed-event arm of the reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingState {
    pub(crate) trip_id: TripId,
    pub(crate) step: BookingStep,
    pub(crate) inventory: InventoryState,
    pub(crate) held_seat: Option<SeatId>,
    pub(crate) draft: Option<ReservationDraft>,
    pub(crate) reservation: Option<Reservation>,
    pub(crate) timer: Option<HoldTimer>,
    pub(crate) timer_generation: u64,
    pub(crate) busy: bool,
    pub(crate) last_error: Option<BookingError>,
}

impl BookingState {
    /// Create the initial state for a trip: seat-selection step, empty
    /// snapshot, nothing held.
    #[must_use]
    pub fn new(trip_id: TripId) -> Self {
        Self {
            trip_id,
            step: BookingStep::default(),
            inventory: InventoryState::new(),
            held_seat: None,
            draft: None,
            reservation: None,
            timer: None,
            timer_generation: 0,
            busy: false,
            last_error: None,
        }
    }

    /// Trip this flow is booking.
    #[must_use]
    pub const fn trip_id(&self) -> TripId {
        self.trip_id
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> BookingStep {
        self.step
    }

    /// The seat inventory snapshot.
    #[must_use]
    pub const fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    /// Seat currently held by this session, if any.
    #[must_use]
    pub const fn held_seat(&self) -> Option<&SeatId> {
        self.held_seat.as_ref()
    }

    /// Current reservation draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&ReservationDraft> {
        self.draft.as_ref()
    }

    /// Reservation created by the service, if any.
    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    /// Running hold countdown, if any.
    #[must_use]
    pub const fn timer(&self) -> Option<&HoldTimer> {
        self.timer.as_ref()
    }

    /// Whether a service call is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Error currently on display, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&BookingError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_empty_seat_selection() {
        let state = BookingState::new(TripId::new(1));
        assert_eq!(state.step(), BookingStep::SeatSelection);
        assert!(state.held_seat().is_none());
        assert!(state.draft().is_none());
        assert!(state.reservation().is_none());
        assert!(state.timer().is_none());
        assert!(!state.is_busy());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn config_defaults_match_service_lock_ttls() {
        let config = FlowConfig::default();
        assert_eq!(config.seat_hold_seconds, 300);
        assert_eq!(config.payment_hold_seconds, 900);
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = FlowConfig::default()
            .with_seat_hold_seconds(10)
            .with_payment_hold_seconds(20);
        assert_eq!(config, FlowConfig::new(10, 20));
    }
}
