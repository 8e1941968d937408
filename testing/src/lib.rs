//! # Bilet Testing
//!
//! Testing utilities and mocks for the bilet seat-reservation flow.
//!
//! This crate provides:
//! - `FixedClock` for deterministic time
//! - A scripted [`mocks::ScriptedBookingService`] with a recorded call log
//! - A channel-backed [`mocks::ChannelSeatFeed`] for driving push messages
//!
//! ## Example
//!
//! ```ignore
//! use bilet_testing::{mocks::ScriptedBookingService, test_clock};
//!
//! #[tokio::test]
//! async fn test_seat_tap() {
//!     let service = Arc::new(ScriptedBookingService::new());
//!     service.refuse_next_select("Koltuk başka bir yolcu tarafından seçilmiş");
//!
//!     let env = ProductionBookingEnvironment::new(
//!         Arc::new(test_clock()),
//!         service.clone(),
//!         SessionId::generate(),
//!         FlowConfig::default(),
//!     );
//!     // ... drive the reducer and assert on service.calls()
//! }
//! ```

use chrono::{DateTime, Utc};
use bilet_core::environment::Clock;

/// Mock implementations of the flow's environment dependencies.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use bilet_core::booking::{
        CardDetails, PassengerInfo, ReservationId, ReservationRecord, SeatId, SessionId, TripId,
    };
    use bilet_core::feed::{FeedError, FeedMessage, FeedStream, SeatFeed};
    use bilet_core::service::{
        BookingService, CreateReservationResponse, ProcessPaymentResponse, ReleaseSeatResponse,
        SelectSeatResponse, ServiceError, ServiceFuture, ServiceResult,
    };
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use tokio::sync::mpsc;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use bilet_testing::mocks::FixedClock;
    /// use bilet_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// One call observed by [`ScriptedBookingService`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        /// `select_seat` was invoked
        SelectSeat {
            /// Trip targeted
            trip_id: TripId,
            /// Seat targeted
            seat_id: SeatId,
            /// Requesting session
            session_id: SessionId,
        },
        /// `release_seat` was invoked
        ReleaseSeat {
            /// Trip targeted
            trip_id: TripId,
            /// Seat targeted
            seat_id: SeatId,
            /// Requesting session
            session_id: SessionId,
        },
        /// `create_reservation` was invoked
        CreateReservation {
            /// Trip targeted
            trip_id: TripId,
            /// Seat targeted
            seat_id: SeatId,
            /// Requesting session
            session_id: SessionId,
            /// Submitted passenger details
            passenger: PassengerInfo,
        },
        /// `process_payment` was invoked
        ProcessPayment {
            /// Reservation being paid
            reservation_id: ReservationId,
            /// Submitted card details
            payment: CardDetails,
        },
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scripted in-memory [`BookingService`].
    ///
    /// Every operation has a queue of scripted outcomes; when the queue is
    /// empty the call succeeds with a generated response, so happy-path tests
    /// need no setup. All calls are recorded for assertion.
    #[derive(Debug, Default)]
    pub struct ScriptedBookingService {
        select_outcomes: Mutex<VecDeque<ServiceResult<SelectSeatResponse>>>,
        release_outcomes: Mutex<VecDeque<ServiceResult<ReleaseSeatResponse>>>,
        reservation_outcomes: Mutex<VecDeque<ServiceResult<CreateReservationResponse>>>,
        payment_outcomes: Mutex<VecDeque<ServiceResult<ProcessPaymentResponse>>>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
        reservation_counter: AtomicU64,
        total_price: Mutex<String>,
    }

    impl ScriptedBookingService {
        /// Create a service that succeeds on every call.
        #[must_use]
        pub fn new() -> Self {
            Self {
                total_price: Mutex::new("150.00".to_string()),
                ..Self::default()
            }
        }

        /// Set the total price reported by default reservation responses.
        #[must_use]
        pub fn with_total_price(self, price: impl Into<String>) -> Self {
            *lock(&self.total_price) = price.into();
            self
        }

        /// Script the next `select_seat` response.
        pub fn push_select_response(&self, response: SelectSeatResponse) {
            lock(&self.select_outcomes).push_back(Ok(response));
        }

        /// Script the next `select_seat` call to be refused by the service.
        pub fn refuse_next_select(&self, message: impl Into<String>) {
            self.push_select_response(SelectSeatResponse {
                success: false,
                message: Some(message.into()),
            });
        }

        /// Script the next `select_seat` call to fail at the transport level.
        pub fn fail_next_select(&self, reason: impl Into<String>) {
            lock(&self.select_outcomes)
                .push_back(Err(ServiceError::Transport(reason.into())));
        }

        /// Script the next `release_seat` call to fail at the transport level.
        pub fn fail_next_release(&self, reason: impl Into<String>) {
            lock(&self.release_outcomes)
                .push_back(Err(ServiceError::Transport(reason.into())));
        }

        /// Script the next `create_reservation` response.
        pub fn push_reservation_response(&self, response: CreateReservationResponse) {
            lock(&self.reservation_outcomes).push_back(Ok(response));
        }

        /// Script the next `create_reservation` call to be refused.
        pub fn refuse_next_reservation(&self, error: impl Into<String>) {
            self.push_reservation_response(CreateReservationResponse {
                success: false,
                reservation: None,
                error: Some(error.into()),
            });
        }

        /// Script the next `create_reservation` call to fail at transport level.
        pub fn fail_next_reservation(&self, reason: impl Into<String>) {
            lock(&self.reservation_outcomes)
                .push_back(Err(ServiceError::Transport(reason.into())));
        }

        /// Script the next `process_payment` response.
        pub fn push_payment_response(&self, response: ProcessPaymentResponse) {
            lock(&self.payment_outcomes).push_back(Ok(response));
        }

        /// Script the next `process_payment` call to be declined.
        pub fn decline_next_payment(&self, error: impl Into<String>) {
            self.push_payment_response(ProcessPaymentResponse {
                success: false,
                error: Some(error.into()),
            });
        }

        /// Script the next `process_payment` call to fail at transport level.
        pub fn fail_next_payment(&self, reason: impl Into<String>) {
            lock(&self.payment_outcomes)
                .push_back(Err(ServiceError::Transport(reason.into())));
        }

        /// All calls observed so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            lock(&self.calls).clone()
        }

        /// Number of `release_seat` calls observed.
        #[must_use]
        pub fn release_count(&self) -> usize {
            lock(&self.calls)
                .iter()
                .filter(|c| matches!(c, RecordedCall::ReleaseSeat { .. }))
                .count()
        }

        fn record(&self, call: RecordedCall) {
            lock(&self.calls).push(call);
        }

        fn next_reservation_record(&self) -> ReservationRecord {
            let n = self.reservation_counter.fetch_add(1, Ordering::SeqCst) + 100;
            ReservationRecord {
                id: ReservationId::new(format!("R{n}")),
                total_price: lock(&self.total_price).clone(),
            }
        }
    }

    impl BookingService for ScriptedBookingService {
        fn select_seat(
            &self,
            trip_id: TripId,
            seat_id: SeatId,
            session_id: SessionId,
        ) -> ServiceFuture<'_, SelectSeatResponse> {
            self.record(RecordedCall::SelectSeat {
                trip_id,
                seat_id,
                session_id,
            });
            let outcome = lock(&self.select_outcomes).pop_front().unwrap_or(Ok(
                SelectSeatResponse {
                    success: true,
                    message: None,
                },
            ));
            Box::pin(async move { outcome })
        }

        fn release_seat(
            &self,
            trip_id: TripId,
            seat_id: SeatId,
            session_id: SessionId,
        ) -> ServiceFuture<'_, ReleaseSeatResponse> {
            self.record(RecordedCall::ReleaseSeat {
                trip_id,
                seat_id,
                session_id,
            });
            let outcome = lock(&self.release_outcomes)
                .pop_front()
                .unwrap_or(Ok(ReleaseSeatResponse { success: true }));
            Box::pin(async move { outcome })
        }

        fn create_reservation(
            &self,
            trip_id: TripId,
            seat_id: SeatId,
            session_id: SessionId,
            passenger: PassengerInfo,
        ) -> ServiceFuture<'_, CreateReservationResponse> {
            self.record(RecordedCall::CreateReservation {
                trip_id,
                seat_id,
                session_id,
                passenger,
            });
            let outcome = lock(&self.reservation_outcomes).pop_front().unwrap_or_else(|| {
                Ok(CreateReservationResponse {
                    success: true,
                    reservation: Some(self.next_reservation_record()),
                    error: None,
                })
            });
            Box::pin(async move { outcome })
        }

        fn process_payment(
            &self,
            reservation_id: ReservationId,
            payment: CardDetails,
        ) -> ServiceFuture<'_, ProcessPaymentResponse> {
            self.record(RecordedCall::ProcessPayment {
                reservation_id,
                payment,
            });
            let outcome = lock(&self.payment_outcomes)
                .pop_front()
                .unwrap_or(Ok(ProcessPaymentResponse {
                    success: true,
                    error: None,
                }));
            Box::pin(async move { outcome })
        }
    }

    /// Channel-backed [`SeatFeed`] for scripting push messages from tests.
    ///
    /// Tests hold the sender half and push messages (or errors, to simulate
    /// connection loss); dropping the sender ends the stream.
    #[derive(Debug)]
    pub struct ChannelSeatFeed {
        receiver: Mutex<Option<mpsc::UnboundedReceiver<Result<FeedMessage, FeedError>>>>,
    }

    /// Sender half used by tests to push feed messages.
    pub type FeedSender = mpsc::UnboundedSender<Result<FeedMessage, FeedError>>;

    impl ChannelSeatFeed {
        /// Create the feed together with the sender half.
        #[must_use]
        pub fn new() -> (Self, FeedSender) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    receiver: Mutex::new(Some(rx)),
                },
                tx,
            )
        }
    }

    impl SeatFeed for ChannelSeatFeed {
        fn subscribe(
            &self,
            _trip_id: TripId,
        ) -> Pin<Box<dyn Future<Output = Result<FeedStream, FeedError>> + Send + '_>> {
            let receiver = lock(&self.receiver).take();
            Box::pin(async move {
                let mut rx = receiver.ok_or_else(|| {
                    FeedError::ConnectionFailed("feed already subscribed".to_string())
                })?;

                let stream = async_stream::stream! {
                    while let Some(item) = rx.recv().await {
                        yield item;
                    }
                };
                Ok(Box::pin(stream) as FeedStream)
            })
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
