//! Reducer for the reservation flow.
//!
//! Implements the four-step state machine (seat-selection → passenger-info →
//! payment → confirmation) with a time-boxed hold. The reducer is pure: it
//! mutates [`BookingState`] in place and describes every service call and
//! countdown tick as an effect for the store to execute.
//!
//! The `busy` flag enforces at most one mutating service call in flight;
//! commands arriving while busy are ignored. Feed deliveries and countdown
//! ticks are processed regardless.

use crate::actions::{BookingAction, FeedEvent};
use crate::environment::BookingEnvironment;
use crate::timer::{HoldKind, HoldTimer};
use crate::types::{BookingError, BookingState, BookingStep, Reservation, ReservationDraft};
use bilet_core::booking::{CardDetails, PassengerInfo, ReservationRecord, SeatId, SeatStatus};
use bilet_core::effect::Effect;
use bilet_core::reducer::Reducer;
use bilet_core::{SmallVec, smallvec};
use std::sync::Arc;
use std::time::Duration;

/// Effect buffer produced per action.
type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Reducer for the booking flow.
///
/// See the [transition table](crate) in the crate docs for the full state
/// machine.
#[derive(Clone, Debug, Default)]
pub struct BookingFlowReducer;

impl BookingFlowReducer {
    /// Creates a new `BookingFlowReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Start (or restart) the hold countdown.
    ///
    /// Bumping the generation makes any tick still in flight for the old
    /// countdown stale, so restarts never double-fire.
    fn start_hold(state: &mut BookingState, kind: HoldKind, seconds: u32) -> Effects {
        state.timer_generation += 1;
        let generation = state.timer_generation;
        state.timer = Some(HoldTimer::new(kind, seconds, generation));

        smallvec![Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(BookingAction::HoldTick { generation }),
        }]
    }

    /// Stop the hold countdown without expiring it.
    fn cancel_hold(state: &mut BookingState) {
        state.timer = None;
        state.timer_generation += 1;
    }

    /// The hold lapsed: drop everything the hold was protecting and return
    /// to seat selection.
    fn expire_hold(state: &mut BookingState) {
        tracing::info!(trip_id = %state.trip_id, "Hold expired, returning to seat selection");
        state.timer = None;
        state.held_seat = None;
        state.draft = None;
        state.reservation = None;
        state.inventory.clear_held();
        state.step = BookingStep::SeatSelection;
        state.last_error = Some(BookingError::HoldExpired);
    }

    fn seat_tapped(state: &mut BookingState, env: &BookingEnvironment, seat_id: SeatId) -> Effects {
        if state.step != BookingStep::SeatSelection || state.busy {
            return SmallVec::new();
        }
        let Some(seat) = state.inventory.seat(&seat_id) else {
            return SmallVec::new();
        };
        if seat.status != SeatStatus::Available {
            return SmallVec::new();
        }

        state.busy = true;
        state.last_error = None;

        let service = Arc::clone(&env.service);
        let session_id = env.session_id.clone();
        let trip_id = state.trip_id;
        let previous = state.held_seat.clone();

        smallvec![Effect::Future(Box::pin(async move {
            // Free the previous hold before taking the new one. Best-effort:
            // the server-side lock expires on its own if this fails.
            if let Some(old) = previous {
                match service
                    .release_seat(trip_id, old.clone(), session_id.clone())
                    .await
                {
                    Ok(response) if !response.success => {
                        tracing::debug!(seat = %old, "Seat release refused");
                    },
                    Ok(_) => {},
                    Err(error) => {
                        tracing::warn!(seat = %old, %error, "Seat release failed");
                    },
                }
            }

            let outcome = match service
                .select_seat(trip_id, seat_id.clone(), session_id)
                .await
            {
                Ok(response) if response.success => BookingAction::SeatSelected { seat_id },
                Ok(response) => {
                    tracing::debug!(
                        seat = %seat_id,
                        message = response.message.as_deref().unwrap_or(""),
                        "Seat select refused"
                    );
                    BookingAction::SeatSelectFailed {
                        seat_id,
                        error: BookingError::SeatUnavailable,
                    }
                },
                Err(error) => BookingAction::SeatSelectFailed {
                    seat_id,
                    error: BookingError::NetworkFailure {
                        reason: error.to_string(),
                    },
                },
            };
            Some(outcome)
        }))]
    }

    fn seat_selected(
        state: &mut BookingState,
        env: &BookingEnvironment,
        seat_id: SeatId,
    ) -> Effects {
        if !state.busy {
            // The flow was torn down or expired while the call was in
            // flight; the orphaned server-side lock expires on its own.
            return SmallVec::new();
        }
        state.busy = false;
        state.last_error = None;
        state.held_seat = Some(seat_id.clone());
        state.inventory.mark_held(&seat_id);
        state.draft = Some(ReservationDraft {
            trip_id: state.trip_id,
            seat_id: seat_id.clone(),
            session_id: env.session_id.clone(),
            passenger: PassengerInfo::default(),
        });

        tracing::debug!(seat = %seat_id, "Seat held");
        Self::start_hold(state, HoldKind::SeatHold, env.config.seat_hold_seconds)
    }

    fn seat_select_failed(
        state: &mut BookingState,
        seat_id: &SeatId,
        error: BookingError,
    ) -> Effects {
        if !state.busy {
            return SmallVec::new();
        }
        state.busy = false;
        tracing::debug!(seat = %seat_id, %error, "Seat select failed");
        state.last_error = Some(error);

        // The previous hold was released before the failed attempt, so it is
        // gone server-side; drop it locally as well.
        if state.held_seat.take().is_some() {
            state.draft = None;
            state.inventory.clear_held();
            Self::cancel_hold(state);
        }
        SmallVec::new()
    }

    fn continue_pressed(state: &mut BookingState) -> Effects {
        if state.step == BookingStep::SeatSelection && state.held_seat.is_some() && !state.busy {
            state.step = BookingStep::PassengerInfo;
        }
        SmallVec::new()
    }

    fn back_pressed(state: &mut BookingState) -> Effects {
        state.step = match state.step {
            BookingStep::PassengerInfo => BookingStep::SeatSelection,
            BookingStep::Payment => BookingStep::PassengerInfo,
            step @ (BookingStep::SeatSelection | BookingStep::Confirmation) => step,
        };
        SmallVec::new()
    }

    fn submit_passenger_info(
        state: &mut BookingState,
        env: &BookingEnvironment,
        passenger: PassengerInfo,
    ) -> Effects {
        if state.step != BookingStep::PassengerInfo || state.busy || state.draft.is_none() {
            return SmallVec::new();
        }

        if let Some(field) = passenger.missing_field() {
            state.last_error = Some(BookingError::ValidationIncomplete {
                field: field.to_string(),
            });
            return SmallVec::new();
        }

        let Some(draft) = state.draft.as_mut() else {
            return SmallVec::new();
        };
        draft.passenger = passenger.clone();
        let trip_id = draft.trip_id;
        let seat_id = draft.seat_id.clone();

        state.busy = true;
        state.last_error = None;

        let service = Arc::clone(&env.service);
        let session_id = env.session_id.clone();

        smallvec![Effect::Future(Box::pin(async move {
            let outcome = match service
                .create_reservation(trip_id, seat_id, session_id, passenger)
                .await
            {
                Ok(response) if response.success => match response.reservation {
                    Some(record) => BookingAction::ReservationCreated { record },
                    None => BookingAction::ReservationFailed {
                        error: BookingError::NetworkFailure {
                            reason: "reservation missing from response".to_string(),
                        },
                    },
                },
                Ok(response) => {
                    // The only domain refusals are a lapsed or stolen seat lock
                    tracing::debug!(
                        error = response.error.as_deref().unwrap_or(""),
                        "Reservation refused"
                    );
                    BookingAction::ReservationFailed {
                        error: BookingError::SeatUnavailable,
                    }
                },
                Err(error) => BookingAction::ReservationFailed {
                    error: BookingError::NetworkFailure {
                        reason: error.to_string(),
                    },
                },
            };
            Some(outcome)
        }))]
    }

    fn reservation_created(
        state: &mut BookingState,
        env: &BookingEnvironment,
        record: ReservationRecord,
    ) -> Effects {
        if !state.busy {
            return SmallVec::new();
        }
        state.busy = false;
        if state.draft.is_none() {
            // The hold expired while the call was in flight; the server-side
            // reservation expires on its own.
            return SmallVec::new();
        }
        state.last_error = None;

        let expires_at = env.clock.now()
            + chrono::Duration::seconds(i64::from(env.config.payment_hold_seconds));
        tracing::info!(reservation = %record.id, %expires_at, "Reservation created");

        state.reservation = Some(Reservation {
            id: record.id,
            total_price: record.total_price,
            expires_at,
        });
        state.step = BookingStep::Payment;

        Self::start_hold(state, HoldKind::PaymentHold, env.config.payment_hold_seconds)
    }

    fn reservation_failed(state: &mut BookingState, error: BookingError) -> Effects {
        if !state.busy {
            return SmallVec::new();
        }
        state.busy = false;
        state.last_error = Some(error);
        SmallVec::new()
    }

    fn submit_payment(
        state: &mut BookingState,
        env: &BookingEnvironment,
        card: CardDetails,
    ) -> Effects {
        if state.step != BookingStep::Payment || state.busy {
            return SmallVec::new();
        }
        let Some(reservation) = state.reservation.as_ref() else {
            return SmallVec::new();
        };

        if let Some(field) = card.missing_field() {
            state.last_error = Some(BookingError::ValidationIncomplete {
                field: field.to_string(),
            });
            return SmallVec::new();
        }

        state.busy = true;
        state.last_error = None;

        let service = Arc::clone(&env.service);
        let reservation_id = reservation.id.clone();

        smallvec![Effect::Future(Box::pin(async move {
            let outcome = match service.process_payment(reservation_id, card).await {
                Ok(response) if response.success => BookingAction::PaymentCompleted,
                Ok(response) => BookingAction::PaymentFailed {
                    error: BookingError::PaymentDeclined {
                        reason: response
                            .error
                            .unwrap_or_else(|| "payment was declined".to_string()),
                    },
                },
                Err(error) => BookingAction::PaymentFailed {
                    error: BookingError::NetworkFailure {
                        reason: error.to_string(),
                    },
                },
            };
            Some(outcome)
        }))]
    }

    fn payment_completed(state: &mut BookingState) -> Effects {
        if !state.busy {
            return SmallVec::new();
        }
        state.busy = false;
        if state.reservation.is_none() {
            // The hold expired while the payment was in flight
            return SmallVec::new();
        }
        if let Some(reservation) = state.reservation.as_ref() {
            tracing::info!(reservation = %reservation.id, "Payment completed");
        }
        state.last_error = None;
        state.draft = None;
        state.step = BookingStep::Confirmation;
        Self::cancel_hold(state);
        SmallVec::new()
    }

    fn payment_failed(state: &mut BookingState, error: BookingError) -> Effects {
        if !state.busy {
            return SmallVec::new();
        }
        state.busy = false;
        tracing::debug!(%error, "Payment failed");
        state.last_error = Some(error);
        SmallVec::new()
    }

    fn hold_tick(state: &mut BookingState, generation: u64) -> Effects {
        let Some(timer) = state.timer.as_mut() else {
            return SmallVec::new();
        };
        if timer.generation() != generation {
            // Tick armed for a countdown that was since replaced or cancelled
            return SmallVec::new();
        }

        if timer.tick() {
            Self::expire_hold(state);
            return SmallVec::new();
        }

        smallvec![Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(BookingAction::HoldTick { generation }),
        }]
    }

    fn abandon(state: &mut BookingState, env: &BookingEnvironment) -> Effects {
        Self::cancel_hold(state);

        // Only an unconverted seat hold needs releasing; a created
        // reservation is the server's to expire.
        let release = match (&state.held_seat, &state.reservation) {
            (Some(seat_id), None) => {
                let service = Arc::clone(&env.service);
                let session_id = env.session_id.clone();
                let trip_id = state.trip_id;
                let seat_id = seat_id.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    if let Err(error) = service.release_seat(trip_id, seat_id.clone(), session_id).await {
                        tracing::warn!(seat = %seat_id, %error, "Seat release on teardown failed");
                    }
                    None
                }))]
            },
            _ => SmallVec::new(),
        };

        tracing::debug!(trip_id = %state.trip_id, "Flow abandoned");
        state.step = BookingStep::SeatSelection;
        state.held_seat = None;
        state.draft = None;
        state.reservation = None;
        state.busy = false;
        state.last_error = None;
        state.inventory.clear_held();

        release
    }

    fn feed_event(state: &mut BookingState, event: FeedEvent) -> Effects {
        match event {
            FeedEvent::Message(message) => {
                state
                    .inventory
                    .replace(message.into_seats(), state.held_seat.as_ref());

                // Until a reservation exists the held seat lives only as a
                // temporary lock; a snapshot reporting it reserved (or gone)
                // means another session took it.
                if state.reservation.is_none() {
                    if let Some(held) = state.held_seat.clone() {
                        let lost = state
                            .inventory
                            .seat(&held)
                            .is_none_or(|seat| seat.status == SeatStatus::Reserved);
                        if lost {
                            tracing::info!(seat = %held, "Held seat lost to another session");
                            state.held_seat = None;
                            state.draft = None;
                            state.inventory.clear_held();
                            Self::cancel_hold(state);
                            state.step = BookingStep::SeatSelection;
                            state.last_error = Some(BookingError::SeatUnavailable);
                        }
                    }
                }
                SmallVec::new()
            },
            FeedEvent::Lost { reason } => {
                tracing::warn!(reason = %reason, "Seat feed lost");
                state.inventory.mark_feed_lost();
                state.last_error = Some(BookingError::FeedLost);
                SmallVec::new()
            },
        }
    }
}

impl Reducer for BookingFlowReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Commands
            BookingAction::SeatTapped { seat_id } => Self::seat_tapped(state, env, seat_id),
            BookingAction::ContinuePressed => Self::continue_pressed(state),
            BookingAction::BackPressed => Self::back_pressed(state),
            BookingAction::SubmitPassengerInfo { passenger } => {
                Self::submit_passenger_info(state, env, passenger)
            },
            BookingAction::SubmitPayment { card } => Self::submit_payment(state, env, card),
            BookingAction::DismissError => {
                state.last_error = None;
                SmallVec::new()
            },
            BookingAction::Abandon => Self::abandon(state, env),

            // Effect feedback
            BookingAction::SeatSelected { seat_id } => Self::seat_selected(state, env, seat_id),
            BookingAction::SeatSelectFailed { seat_id, error } => {
                Self::seat_select_failed(state, &seat_id, error)
            },
            BookingAction::ReservationCreated { record } => {
                Self::reservation_created(state, env, record)
            },
            BookingAction::ReservationFailed { error } => Self::reservation_failed(state, error),
            BookingAction::PaymentCompleted => Self::payment_completed(state),
            BookingAction::PaymentFailed { error } => Self::payment_failed(state, error),
            BookingAction::HoldTick { generation } => Self::hold_tick(state, generation),

            // Push feed
            BookingAction::Feed(event) => Self::feed_event(state, event),
        }
    }
}
