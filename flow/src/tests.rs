//! Unit tests for the booking flow reducer.
//!
//! These drive the reducer directly (no store, no executed effects) and feed
//! the effect-outcome events by hand, which keeps every transition
//! deterministic. Store-level coverage with executed effects lives in
//! `tests/flow_integration.rs`.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use crate::actions::{BookingAction, FeedEvent};
use crate::environment::BookingEnvironment;
use crate::reducer::BookingFlowReducer;
use crate::timer::HoldKind;
use crate::types::{BookingError, BookingState, BookingStep, FlowConfig};
use bilet_core::booking::{
    CardDetails, PassengerInfo, PaymentMethod, ReservationId, ReservationRecord, Seat, SeatId,
    SeatStatus, SessionId, TripId,
};
use bilet_core::effect::Effect;
use bilet_core::environment::Clock;
use bilet_core::feed::FeedMessage;
use bilet_core::reducer::Reducer;
use bilet_testing::mocks::ScriptedBookingService;
use bilet_testing::test_clock;
use chrono::Utc;
use std::sync::Arc;

const TRIP: TripId = TripId::new(1);

fn test_env() -> BookingEnvironment {
    BookingEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(ScriptedBookingService::new()),
        SessionId::from_token("session-test"),
        FlowConfig::default(),
    )
}

/// Twelve rows of four seats, all available.
fn full_seat_list() -> Vec<Seat> {
    let mut seats = Vec::new();
    for row in 1..=12 {
        for letter in ['A', 'B', 'C', 'D'] {
            seats.push(Seat::new(row, letter, SeatStatus::Available));
        }
    }
    seats
}

fn initial_snapshot() -> BookingAction {
    BookingAction::Feed(FeedEvent::Message(FeedMessage::InitialSeats {
        seats: full_seat_list(),
    }))
}

fn update_snapshot(seats: Vec<Seat>) -> BookingAction {
    BookingAction::Feed(FeedEvent::Message(FeedMessage::SeatStatusUpdate {
        seats,
        trip_id: Some(TRIP),
        timestamp: Some(Utc::now()),
    }))
}

/// State with the seat map loaded.
fn seeded_state(reducer: &BookingFlowReducer, env: &BookingEnvironment) -> BookingState {
    let mut state = BookingState::new(TRIP);
    reducer.reduce(&mut state, initial_snapshot(), env);
    state
}

/// Drive a successful seat hold: tap, then the select outcome.
fn hold_seat(
    reducer: &BookingFlowReducer,
    state: &mut BookingState,
    env: &BookingEnvironment,
    seat: &str,
) {
    let effects = reducer.reduce(
        state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from(seat),
        },
        env,
    );
    assert_eq!(effects.len(), 1, "tap should issue the select call");
    reducer.reduce(
        state,
        BookingAction::SeatSelected {
            seat_id: SeatId::from(seat),
        },
        env,
    );
}

/// Drive the flow to the payment step with a created reservation.
fn reach_payment(
    reducer: &BookingFlowReducer,
    state: &mut BookingState,
    env: &BookingEnvironment,
) {
    hold_seat(reducer, state, env, "3A");
    reducer.reduce(state, BookingAction::ContinuePressed, env);
    reducer.reduce(
        state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com"),
        },
        env,
    );
    reducer.reduce(
        state,
        BookingAction::ReservationCreated {
            record: ReservationRecord {
                id: ReservationId::new("R100"),
                total_price: "150.00".to_string(),
            },
        },
        env,
    );
}

fn valid_card() -> CardDetails {
    CardDetails {
        method: PaymentMethod::CreditCard,
        card_number: "1234 5678 9012 3456".to_string(),
        card_name: "AYŞE YILMAZ".to_string(),
        expiry: "12/27".to_string(),
        cvv: "123".to_string(),
    }
}

// ============================================================================
// Seat selection
// ============================================================================

#[test]
fn tapping_an_available_seat_issues_the_select_call() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("3A"),
        },
        &env,
    );

    assert!(state.is_busy());
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::Future(_)));
    // Nothing held until the service confirms
    assert!(state.held_seat().is_none());
}

#[test]
fn tapping_an_unknown_seat_is_ignored() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("99Z"),
        },
        &env,
    );

    assert!(effects.is_empty());
    assert!(!state.is_busy());
}

#[test]
fn tapping_a_reserved_seat_is_ignored() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    let mut seats = full_seat_list();
    seats[0].status = SeatStatus::Reserved;
    reducer.reduce(&mut state, update_snapshot(seats), &env);

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("1A"),
        },
        &env,
    );

    assert!(effects.is_empty());
    assert!(!state.is_busy());
}

#[test]
fn a_second_tap_while_a_call_is_pending_is_ignored() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("3A"),
        },
        &env,
    );
    assert!(state.is_busy());

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("3B"),
        },
        &env,
    );

    assert!(effects.is_empty());
}

#[test]
fn a_successful_select_holds_the_seat_and_starts_the_countdown() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");

    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert_eq!(state.held_seat(), Some(&SeatId::from("3A")));
    assert_eq!(state.inventory().held_by_me_count(), 1);
    assert!(!state.is_busy());

    let draft = state.draft().expect("draft created on hold");
    assert_eq!(draft.seat_id, SeatId::from("3A"));
    assert_eq!(draft.session_id.as_str(), "session-test");

    let timer = state.timer().expect("seat hold countdown running");
    assert_eq!(timer.kind(), HoldKind::SeatHold);
    assert_eq!(timer.remaining_seconds(), 300);
}

#[test]
fn a_refused_select_surfaces_seat_unavailable_and_stays() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("3A"),
        },
        &env,
    );
    let effects = reducer.reduce(
        &mut state,
        BookingAction::SeatSelectFailed {
            seat_id: SeatId::from("3A"),
            error: BookingError::SeatUnavailable,
        },
        &env,
    );

    assert!(effects.is_empty());
    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert_eq!(state.last_error(), Some(&BookingError::SeatUnavailable));
    assert!(!state.is_busy());
    assert!(state.held_seat().is_none());
}

#[test]
fn a_failed_retap_drops_the_previous_hold() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");

    // Retap a different seat; the old lock is released before the attempt,
    // so a failure leaves nothing held
    reducer.reduce(
        &mut state,
        BookingAction::SeatTapped {
            seat_id: SeatId::from("3B"),
        },
        &env,
    );
    reducer.reduce(
        &mut state,
        BookingAction::SeatSelectFailed {
            seat_id: SeatId::from("3B"),
            error: BookingError::SeatUnavailable,
        },
        &env,
    );

    assert!(state.held_seat().is_none());
    assert!(state.draft().is_none());
    assert!(state.timer().is_none());
    assert_eq!(state.inventory().held_by_me_count(), 0);
}

#[test]
fn retapping_moves_the_hold_and_restarts_the_countdown() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    let first_generation = state.timer().unwrap().generation();

    hold_seat(&reducer, &mut state, &env, "3B");

    assert_eq!(state.held_seat(), Some(&SeatId::from("3B")));
    assert_eq!(state.inventory().held_by_me_count(), 1);
    let timer = state.timer().unwrap();
    assert_eq!(timer.remaining_seconds(), 300);
    assert_ne!(timer.generation(), first_generation);
}

// ============================================================================
// Step navigation
// ============================================================================

#[test]
fn continue_is_a_no_op_without_a_held_seat() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    let effects = reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);

    assert!(effects.is_empty());
    assert_eq!(state.step(), BookingStep::SeatSelection);
}

#[test]
fn continue_with_a_held_seat_advances_to_passenger_info() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);

    assert_eq!(state.step(), BookingStep::PassengerInfo);
}

#[test]
fn back_returns_one_step_and_keeps_the_hold() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);
    reducer.reduce(&mut state, BookingAction::BackPressed, &env);

    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert_eq!(state.held_seat(), Some(&SeatId::from("3A")));
    assert!(state.timer().is_some(), "countdown keeps running across back");
}

#[test]
fn back_from_payment_returns_to_passenger_info() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);
    reducer.reduce(&mut state, BookingAction::BackPressed, &env);

    assert_eq!(state.step(), BookingStep::PassengerInfo);
}

// ============================================================================
// Passenger info and reservation
// ============================================================================

#[test]
fn incomplete_passenger_info_is_rejected_without_a_call() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "", "a@x.com"),
        },
        &env,
    );

    assert!(effects.is_empty());
    assert_eq!(state.step(), BookingStep::PassengerInfo);
    assert_eq!(
        state.last_error(),
        Some(&BookingError::ValidationIncomplete {
            field: "phone".to_string()
        })
    );
    assert!(!state.is_busy());
}

#[test]
fn valid_passenger_info_issues_the_reservation_call() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);

    let effects = reducer.reduce(
        &mut state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com"),
        },
        &env,
    );

    assert!(state.is_busy());
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::Future(_)));
    assert_eq!(
        state.draft().unwrap().passenger,
        PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com")
    );
}

#[test]
fn a_created_reservation_advances_to_payment_with_a_fresh_countdown() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);

    assert_eq!(state.step(), BookingStep::Payment);
    assert!(!state.is_busy());

    let reservation = state.reservation().expect("reservation stored");
    assert_eq!(reservation.id.as_str(), "R100");
    assert_eq!(reservation.total_price, "150.00");
    assert_eq!(
        reservation.expires_at,
        test_clock().now() + chrono::Duration::seconds(900)
    );

    let timer = state.timer().expect("payment countdown running");
    assert_eq!(timer.kind(), HoldKind::PaymentHold);
    assert_eq!(timer.remaining_seconds(), 900);
}

#[test]
fn a_failed_reservation_stays_on_passenger_info() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);
    reducer.reduce(
        &mut state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com"),
        },
        &env,
    );
    reducer.reduce(
        &mut state,
        BookingAction::ReservationFailed {
            error: BookingError::SeatUnavailable,
        },
        &env,
    );

    assert_eq!(state.step(), BookingStep::PassengerInfo);
    assert_eq!(state.last_error(), Some(&BookingError::SeatUnavailable));
    assert!(!state.is_busy());
}

// ============================================================================
// Payment
// ============================================================================

#[test]
fn payment_with_a_missing_cvv_is_rejected_without_a_call() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);

    let mut card = valid_card();
    card.cvv = String::new();
    let effects = reducer.reduce(&mut state, BookingAction::SubmitPayment { card }, &env);

    assert!(effects.is_empty());
    assert_eq!(state.step(), BookingStep::Payment);
    assert_eq!(
        state.last_error(),
        Some(&BookingError::ValidationIncomplete {
            field: "cvv".to_string()
        })
    );
}

#[test]
fn a_completed_payment_reaches_confirmation_and_stops_the_countdown() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);
    reducer.reduce(
        &mut state,
        BookingAction::SubmitPayment { card: valid_card() },
        &env,
    );
    reducer.reduce(&mut state, BookingAction::PaymentCompleted, &env);

    assert_eq!(state.step(), BookingStep::Confirmation);
    assert!(state.timer().is_none());
    assert!(state.draft().is_none());
    // Reservation retained for the ticket display
    assert_eq!(state.reservation().unwrap().id.as_str(), "R100");
}

#[test]
fn a_declined_payment_stays_on_payment_for_retry() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);
    reducer.reduce(
        &mut state,
        BookingAction::SubmitPayment { card: valid_card() },
        &env,
    );
    reducer.reduce(
        &mut state,
        BookingAction::PaymentFailed {
            error: BookingError::PaymentDeclined {
                reason: "Kart limiti yetersiz".to_string(),
            },
        },
        &env,
    );

    assert_eq!(state.step(), BookingStep::Payment);
    assert!(state.reservation().is_some());
    assert!(matches!(
        state.last_error(),
        Some(BookingError::PaymentDeclined { .. })
    ));
}

// ============================================================================
// Hold countdown
// ============================================================================

#[test]
fn the_seat_hold_expiring_returns_to_seat_selection() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    let generation = state.timer().unwrap().generation();

    for _ in 0..300 {
        reducer.reduce(&mut state, BookingAction::HoldTick { generation }, &env);
    }

    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert!(state.held_seat().is_none());
    assert!(state.draft().is_none());
    assert!(state.timer().is_none());
    assert_eq!(state.inventory().held_by_me_count(), 0);
    assert_eq!(state.last_error(), Some(&BookingError::HoldExpired));
}

#[test]
fn expiry_during_payment_clears_the_reservation() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);
    let generation = state.timer().unwrap().generation();

    for _ in 0..900 {
        reducer.reduce(&mut state, BookingAction::HoldTick { generation }, &env);
    }

    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert!(state.reservation().is_none());
    assert!(state.draft().is_none());
    assert_eq!(state.last_error(), Some(&BookingError::HoldExpired));
}

#[test]
fn ticks_from_a_replaced_countdown_are_dropped() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    let stale_generation = state.timer().unwrap().generation();

    // Creating the reservation replaces the countdown
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);
    reducer.reduce(
        &mut state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com"),
        },
        &env,
    );
    reducer.reduce(
        &mut state,
        BookingAction::ReservationCreated {
            record: ReservationRecord {
                id: ReservationId::new("R100"),
                total_price: "150.00".to_string(),
            },
        },
        &env,
    );

    // A stale tick must neither advance nor expire the new countdown
    for _ in 0..1000 {
        let effects = reducer.reduce(
            &mut state,
            BookingAction::HoldTick {
                generation: stale_generation,
            },
            &env,
        );
        assert!(effects.is_empty());
    }

    assert_eq!(state.step(), BookingStep::Payment);
    assert_eq!(state.timer().unwrap().remaining_seconds(), 900);
}

#[test]
fn one_tick_decrements_and_rearms() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    let generation = state.timer().unwrap().generation();

    let effects = reducer.reduce(&mut state, BookingAction::HoldTick { generation }, &env);

    assert_eq!(state.timer().unwrap().remaining_seconds(), 299);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::Delay { .. }));
}

#[test]
fn a_reservation_outcome_landing_after_expiry_is_dropped() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);
    reducer.reduce(
        &mut state,
        BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "a@x.com"),
        },
        &env,
    );
    assert!(state.is_busy());

    // The seat hold lapses while the reservation call is in flight
    let generation = state.timer().unwrap().generation();
    for _ in 0..300 {
        reducer.reduce(&mut state, BookingAction::HoldTick { generation }, &env);
    }
    assert_eq!(state.step(), BookingStep::SeatSelection);

    // The late outcome is dropped, it only clears the busy flag
    reducer.reduce(
        &mut state,
        BookingAction::ReservationCreated {
            record: ReservationRecord {
                id: ReservationId::new("R200"),
                total_price: "150.00".to_string(),
            },
        },
        &env,
    );

    assert!(state.reservation().is_none());
    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert!(!state.is_busy());
}

// ============================================================================
// Push feed
// ============================================================================

#[test]
fn a_snapshot_replacement_keeps_the_held_seat_marked() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");

    // The feed reports our own lock as temp_locked like anyone else's
    let mut seats = full_seat_list();
    for seat in &mut seats {
        if seat.id.as_str() == "3A" {
            seat.status = SeatStatus::HeldByOthers;
        }
    }
    reducer.reduce(&mut state, update_snapshot(seats), &env);

    assert_eq!(state.held_seat(), Some(&SeatId::from("3A")));
    assert_eq!(state.inventory().held_by_me_count(), 1);
    assert_eq!(
        state.inventory().seat(&SeatId::from("3A")).unwrap().status,
        SeatStatus::HeldByMe
    );
}

#[test]
fn the_held_seat_reported_reserved_falls_back_to_seat_selection() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "5B");
    reducer.reduce(&mut state, BookingAction::ContinuePressed, &env);
    assert_eq!(state.step(), BookingStep::PassengerInfo);

    // Another session completed a reservation for our held seat
    let mut seats = full_seat_list();
    for seat in &mut seats {
        if seat.id.as_str() == "5B" {
            seat.status = SeatStatus::Reserved;
        }
    }
    reducer.reduce(&mut state, update_snapshot(seats), &env);

    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert!(state.held_seat().is_none());
    assert!(state.draft().is_none());
    assert!(state.timer().is_none());
    assert_eq!(state.last_error(), Some(&BookingError::SeatUnavailable));
}

#[test]
fn a_reserved_report_after_our_own_reservation_is_expected() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);

    // Our own pending reservation makes the service report the seat reserved
    let mut seats = full_seat_list();
    for seat in &mut seats {
        if seat.id.as_str() == "3A" {
            seat.status = SeatStatus::Reserved;
        }
    }
    reducer.reduce(&mut state, update_snapshot(seats), &env);

    assert_eq!(state.step(), BookingStep::Payment);
    assert!(state.reservation().is_some());
    assert!(state.last_error().is_none());
}

#[test]
fn a_lost_feed_is_surfaced_without_changing_step() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    reducer.reduce(
        &mut state,
        BookingAction::Feed(FeedEvent::Lost {
            reason: "connection reset".to_string(),
        }),
        &env,
    );

    assert!(state.inventory().is_feed_lost());
    assert_eq!(state.last_error(), Some(&BookingError::FeedLost));
    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert_eq!(state.held_seat(), Some(&SeatId::from("3A")));
}

// ============================================================================
// Teardown and errors
// ============================================================================

#[test]
fn abandon_with_a_bare_hold_issues_a_release_and_resets() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    hold_seat(&reducer, &mut state, &env, "3A");
    let effects = reducer.reduce(&mut state, BookingAction::Abandon, &env);

    assert_eq!(effects.len(), 1, "best-effort release for the bare hold");
    assert!(matches!(effects[0], Effect::Future(_)));
    assert_eq!(state.step(), BookingStep::SeatSelection);
    assert!(state.held_seat().is_none());
    assert!(state.timer().is_none());
    assert!(state.last_error().is_none());
}

#[test]
fn abandon_with_a_reservation_releases_nothing() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reach_payment(&reducer, &mut state, &env);
    let effects = reducer.reduce(&mut state, BookingAction::Abandon, &env);

    assert!(effects.is_empty(), "the reservation is the server's to expire");
    assert!(state.reservation().is_none());
    assert!(state.timer().is_none());
}

#[test]
fn dismissing_the_error_clears_the_banner() {
    let reducer = BookingFlowReducer::new();
    let env = test_env();
    let mut state = seeded_state(&reducer, &env);

    reducer.reduce(
        &mut state,
        BookingAction::Feed(FeedEvent::Lost {
            reason: "gone".to_string(),
        }),
        &env,
    );
    assert!(state.last_error().is_some());

    reducer.reduce(&mut state, BookingAction::DismissError, &env);
    assert!(state.last_error().is_none());
}

// ============================================================================
// Invariants
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn seat_id_for(index: usize) -> SeatId {
        let row = u32::try_from(index / 4).unwrap_or(0) + 1;
        let letter = ['A', 'B', 'C', 'D'][index % 4];
        SeatId::new(format!("{row}{letter}"))
    }

    proptest! {
        /// For all sequences of taps, select outcomes, and snapshot
        /// replacements, at most one seat ever carries the held-by-me mark.
        #[test]
        fn at_most_one_seat_is_ever_held(ops in prop::collection::vec((0u8..4, 0usize..48), 0..60)) {
            let reducer = BookingFlowReducer::new();
            let env = test_env();
            let mut state = seeded_state(&reducer, &env);

            for (op, index) in ops {
                let seat_id = seat_id_for(index);
                let action = match op {
                    0 => BookingAction::SeatTapped { seat_id },
                    1 => BookingAction::SeatSelected { seat_id },
                    2 => BookingAction::SeatSelectFailed {
                        seat_id,
                        error: BookingError::SeatUnavailable,
                    },
                    _ => {
                        let mut seats = full_seat_list();
                        if let Some(seat) = seats.get_mut(index) {
                            seat.status = SeatStatus::HeldByOthers;
                        }
                        update_snapshot(seats)
                    },
                };
                reducer.reduce(&mut state, action, &env);

                prop_assert!(state.inventory().held_by_me_count() <= 1);
                if let Some(held) = state.held_seat() {
                    // The mark, when present, sits on the held seat
                    for seat in state.inventory().seats() {
                        if seat.status == SeatStatus::HeldByMe {
                            prop_assert_eq!(&seat.id, held);
                        }
                    }
                } else {
                    prop_assert_eq!(state.inventory().held_by_me_count(), 0);
                }
            }
        }
    }
}
