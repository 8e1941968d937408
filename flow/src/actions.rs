//! Actions for the reservation flow.
//!
//! One enum carries every input the reducer can see: commands raised by the
//! visitor, events fed back by service-call effects, countdown ticks, and
//! push-feed deliveries. Commands request a transition; events record what
//! actually happened.

use crate::types::BookingError;
use bilet_core::booking::{CardDetails, PassengerInfo, ReservationRecord, SeatId};
use bilet_core::feed::FeedMessage;
use serde::{Deserialize, Serialize};

/// Deliveries from the push-feed subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedEvent {
    /// A pushed seat-list message (initial or update)
    Message(FeedMessage),
    /// The subscription failed or dropped
    Lost {
        /// Description of what went wrong
        reason: String,
    },
}

/// All inputs to the booking flow reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookingAction {
    // Commands (visitor intents)
    /// The visitor tapped a seat on the map
    SeatTapped {
        /// The tapped seat
        seat_id: SeatId,
    },
    /// The visitor confirmed the held seat and wants to continue
    ContinuePressed,
    /// The visitor pressed back
    BackPressed,
    /// The visitor submitted the passenger form
    SubmitPassengerInfo {
        /// Entered passenger details
        passenger: PassengerInfo,
    },
    /// The visitor submitted the payment form
    SubmitPayment {
        /// Entered card details
        card: CardDetails,
    },
    /// The visitor dismissed the error banner
    DismissError,
    /// The visitor navigated away from the flow entirely
    Abandon,

    // Events (effect feedback)
    /// The seat-select call succeeded; the hold is placed
    SeatSelected {
        /// The seat now held by this session
        seat_id: SeatId,
    },
    /// The seat-select call was refused or could not complete
    SeatSelectFailed {
        /// The seat that was tapped
        seat_id: SeatId,
        /// Why the hold was not placed
        error: BookingError,
    },
    /// The reservation-create call succeeded
    ReservationCreated {
        /// The created reservation
        record: ReservationRecord,
    },
    /// The reservation-create call was refused or could not complete
    ReservationFailed {
        /// Why the reservation was not created
        error: BookingError,
    },
    /// The payment call succeeded
    PaymentCompleted,
    /// The payment call was declined or could not complete
    PaymentFailed {
        /// Why the payment did not go through
        error: BookingError,
    },
    /// One second elapsed on the hold countdown
    HoldTick {
        /// Generation of the countdown this tick was armed for
        generation: u64,
    },

    // Push feed
    /// A delivery from the seat feed
    Feed(FeedEvent),
}
