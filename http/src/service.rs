//! HTTP implementation of the booking service client.
//!
//! Posts JSON to the service's endpoints:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | select seat | `POST /api/select-seat/` |
//! | release seat | `POST /api/release-seat/` |
//! | create reservation | `POST /api/create-reservation/` |
//! | process payment | `POST /api/process-payment/` |
//!
//! The service answers refusals with the same JSON envelope on a non-2xx
//! status, so the body is decoded regardless of status code. Only transport
//! failures and undecodable bodies become [`ServiceError`]s.

use bilet_core::booking::{CardDetails, PassengerInfo, ReservationId, SeatId, SessionId, TripId};
use bilet_core::service::{
    BookingService, CreateReservationResponse, ProcessPaymentResponse, ReleaseSeatResponse,
    SelectSeatResponse, ServiceError, ServiceFuture, ServiceResult,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Request body for seat select and release.
#[derive(Debug, Serialize)]
struct SeatLockRequest {
    trip_id: TripId,
    seat_id: SeatId,
    user_session: SessionId,
}

/// Request body for reservation creation.
#[derive(Debug, Serialize)]
struct CreateReservationRequest {
    trip_id: TripId,
    seat_id: SeatId,
    user_session: SessionId,
    passenger: PassengerInfo,
}

/// Request body for payment processing.
#[derive(Debug, Serialize)]
struct ProcessPaymentRequest {
    reservation_id: ReservationId,
    payment: CardDetails,
}

/// [`BookingService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBookingService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingService {
    /// Create an adapter for the service at `base_url`
    /// (e.g. `https://bilet.example.com`, no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create an adapter reusing an existing client (connection pool,
    /// timeouts, proxy settings).
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ServiceResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "Booking service call");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|error| ServiceError::Transport(error.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| ServiceError::Transport(error.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|error| {
            ServiceError::MalformedResponse(format!("{error} (status {status})"))
        })
    }
}

impl BookingService for HttpBookingService {
    fn select_seat(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
    ) -> ServiceFuture<'_, SelectSeatResponse> {
        let body = SeatLockRequest {
            trip_id,
            seat_id,
            user_session: session_id,
        };
        Box::pin(async move { self.post_json("/api/select-seat/", &body).await })
    }

    fn release_seat(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
    ) -> ServiceFuture<'_, ReleaseSeatResponse> {
        let body = SeatLockRequest {
            trip_id,
            seat_id,
            user_session: session_id,
        };
        Box::pin(async move { self.post_json("/api/release-seat/", &body).await })
    }

    fn create_reservation(
        &self,
        trip_id: TripId,
        seat_id: SeatId,
        session_id: SessionId,
        passenger: PassengerInfo,
    ) -> ServiceFuture<'_, CreateReservationResponse> {
        let body = CreateReservationRequest {
            trip_id,
            seat_id,
            user_session: session_id,
            passenger,
        };
        Box::pin(async move { self.post_json("/api/create-reservation/", &body).await })
    }

    fn process_payment(
        &self,
        reservation_id: ReservationId,
        payment: CardDetails,
    ) -> ServiceFuture<'_, ProcessPaymentResponse> {
        let body = ProcessPaymentRequest {
            reservation_id,
            payment,
        };
        Box::pin(async move { self.post_json("/api/process-payment/", &body).await })
    }
}
