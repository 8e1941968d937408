//! Booking service client contract.
//!
//! This module defines the [`BookingService`] trait for the four
//! request/response calls the reservation flow issues: seat select, seat
//! release, reservation create, and payment process. The flow never talks to
//! the network itself - reducers describe the call as an effect, and the
//! effect captures an `Arc<dyn BookingService>` from the environment.
//!
//! # Semantics
//!
//! - Every call resolves to a response envelope mirroring the service's JSON:
//!   a `success` flag plus an optional message/error. A domain refusal
//!   (seat taken, reservation expired, card declined) is a *successful* call
//!   with `success: false` - only transport-level problems surface as
//!   [`ServiceError`].
//! - `select_seat` is idempotent per session: re-selecting a seat the same
//!   session already holds extends the lock rather than failing.
//! - `release_seat` is fire-and-forget from the flow's point of view;
//!   callers log failures and move on, since the server-side hold expires on
//!   its own.
//!
//! # Dyn Compatibility
//!
//! This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` to enable trait object usage (`Arc<dyn BookingService>`). This
//! is required for the effect system, where reducers create effects that
//! capture the service handle.

use crate::booking::{
    CardDetails, PassengerInfo, ReservationId, ReservationRecord, SeatId, SessionId, TripId,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Transport-level failure of a booking service call.
///
/// Domain refusals are not errors - they arrive inside the response
/// envelopes with `success: false`.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// The request could not be delivered or the connection dropped
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Result alias for booking service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Boxed future returned by [`BookingService`] methods.
pub type ServiceFuture<'a, T> =
    Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'a>>;

/// Response to a seat-select call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSeatResponse {
    /// Whether the temporary lock was taken
    pub success: bool,
    /// Service message, set when the seat is locked by another session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response to a seat-release call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSeatResponse {
    /// Whether a lock owned by this session was removed
    pub success: bool,
}

/// Response to a reservation-create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    /// Whether the reservation was created
    pub success: bool,
    /// The created reservation, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationRecord>,
    /// Failure reason, present on refusal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response to a payment-process call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentResponse {
    /// Whether the payment went through
    pub success: bool,
    /// Decline reason, present on refusal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trait for booking service client implementations.
///
/// Production uses the HTTP adapter; tests use a scripted in-memory
/// implementation.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single `Arc<dyn BookingService>`
/// can be captured by concurrently spawned effect tasks.
pub trait BookingService: Send + Sync {
    /// Take a temporary lock on a seat for this session.
    ///
    /// `success: false` means the seat is locked by another session; the
    /// accompanying `message` explains the refusal.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the call cannot complete.
    fn select_seat(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
    ) -> ServiceFuture<'_, SelectSeatResponse>;

    /// Release a temporary lock held by this session.
    ///
    /// Best-effort: the flow logs failures instead of surfacing them, and
    /// the server-side lock expires independently.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the call cannot complete.
    fn release_seat(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
    ) -> ServiceFuture<'_, ReleaseSeatResponse>;

    /// Convert this session's temporary lock into a pending reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the call cannot complete.
    fn create_reservation(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
        passenger: PassengerInfo,
    ) -> ServiceFuture<'_, CreateReservationResponse>;

    /// Charge the card and confirm a pending reservation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the call cannot complete.
    fn process_payment(
        &self,
        reservation_id: ReservationId,
        payment: CardDetails,
    ) -> ServiceFuture<'_, ProcessPaymentResponse>;
}
