//! Booking Flow Demo
//!
//! Walks the reservation flow end to end against the scripted in-memory
//! service: seat selection with a live hold countdown, passenger info,
//! payment, confirmation - then a second run that lets the hold expire.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin demo
//! ```

use anyhow::Result;
use bilet_core::booking::{
    CardDetails, PassengerInfo, PaymentMethod, Seat, SeatId, SeatStatus, SessionId, TripId,
};
use bilet_core::feed::FeedMessage;
use bilet_flow::{
    BookingAction, BookingEnvironment, BookingStep, FeedEvent, FlowConfig, booking_store,
};
use bilet_testing::mocks::ScriptedBookingService;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn seat_map() -> Vec<Seat> {
    let mut seats = Vec::new();
    for row in 1..=12 {
        for letter in ['A', 'B', 'C', 'D'] {
            let status = if row == 7 && letter == 'C' {
                SeatStatus::Reserved
            } else {
                SeatStatus::Available
            };
            seats.push(Seat::new(row, letter, status));
        }
    }
    seats
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bilet_flow=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🚌 ============================================");
    println!("   Seat Reservation Flow - Demo");
    println!("============================================\n");

    let service = Arc::new(ScriptedBookingService::new());
    let env = BookingEnvironment::new(
        Arc::new(bilet_core::environment::SystemClock),
        Arc::clone(&service) as Arc<dyn bilet_core::service::BookingService>,
        SessionId::generate(),
        // Short holds so the expiry run finishes quickly
        FlowConfig::default().with_seat_hold_seconds(3),
    );

    let trip_id = TripId::new(1);
    let store = booking_store(trip_id, env);

    println!("📋 Trip: İstanbul → Ankara, 12 rows of 4 seats\n");

    // Step 0: the seat map arrives over the push feed
    store
        .send(BookingAction::Feed(FeedEvent::Message(
            FeedMessage::InitialSeats { seats: seat_map() },
        )))
        .await?;
    let available = store.state(|s| s.inventory().available_count()).await;
    println!("✓ Seat map loaded: {available} seats available\n");

    // Step 1: hold a seat
    println!("1️⃣  Selecting seat 3A...");
    let mut handle = store
        .send(BookingAction::SeatTapped {
            seat_id: SeatId::from("3A"),
        })
        .await?;
    handle.wait().await;

    let remaining = store
        .state(|s| s.timer().map(bilet_flow::HoldTimer::format_remaining))
        .await;
    println!(
        "   ✓ Seat 3A held, countdown {}\n",
        remaining.unwrap_or_default()
    );

    // Step 2: passenger details
    println!("2️⃣  Entering passenger details...");
    store.send(BookingAction::ContinuePressed).await?;
    let mut handle = store
        .send(BookingAction::SubmitPassengerInfo {
            passenger: PassengerInfo::new("Ayşe Yılmaz", "05321234567", "ayse@example.com"),
        })
        .await?;
    handle.wait().await;

    if let Some(reservation) = store.state(|s| s.reservation().cloned()).await {
        println!(
            "   ✓ Reservation {} created, total ₺{}\n",
            reservation.id, reservation.total_price
        );
    }

    // Step 3: payment
    println!("3️⃣  Paying...");
    let mut handle = store
        .send(BookingAction::SubmitPayment {
            card: CardDetails {
                method: PaymentMethod::CreditCard,
                card_number: "1234 5678 9012 3456".to_string(),
                card_name: "AYŞE YILMAZ".to_string(),
                expiry: "12/27".to_string(),
                cvv: "123".to_string(),
            },
        })
        .await?;
    handle.wait().await;

    let step = store.state(|s| s.step()).await;
    assert_eq!(step, BookingStep::Confirmation);
    println!("   ✓ Payment completed, ticket confirmed\n");

    // Second run: let the hold lapse
    println!("4️⃣  Second visitor holds 5B and walks away...");
    store.send(BookingAction::Abandon).await?;
    let mut handle = store
        .send(BookingAction::SeatTapped {
            seat_id: SeatId::from("5B"),
        })
        .await?;
    handle.wait().await;

    println!("   ⏳ Waiting for the 3 second hold to lapse...");
    tokio::time::sleep(Duration::from_secs(5)).await;

    let (step, error) = store
        .state(|s| (s.step(), s.last_error().cloned()))
        .await;
    println!(
        "   ✓ Back to {:?}, surfaced: {}\n",
        step,
        error.map(|e| e.to_string()).unwrap_or_default()
    );

    store.shutdown(Duration::from_secs(5)).await?;
    println!("✓ Demo finished");
    Ok(())
}
