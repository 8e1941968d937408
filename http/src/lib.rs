//! # Bilet HTTP
//!
//! Production adapters for the booking service:
//!
//! - [`HttpBookingService`] implements
//!   [`BookingService`](bilet_core::service::BookingService) over the
//!   service's JSON endpoints
//! - [`WsSeatFeed`] implements [`SeatFeed`](bilet_core::feed::SeatFeed) over
//!   the per-trip WebSocket feed
//!
//! Both adapters translate transport and decode problems into the core error
//! types; domain refusals pass through untouched inside the response
//! envelopes.
//!
//! ## Example
//!
//! ```ignore
//! use bilet_http::{HttpBookingService, WsSeatFeed};
//!
//! let service = Arc::new(HttpBookingService::new("https://bilet.example.com"));
//! let feed = Arc::new(WsSeatFeed::new("wss://bilet.example.com"));
//!
//! let env = BookingEnvironment::new(
//!     Arc::new(SystemClock),
//!     service,
//!     SessionId::generate(),
//!     FlowConfig::default(),
//! );
//! let store = booking_store(trip_id, env);
//! let pump = spawn_feed_pump(store.clone(), feed, trip_id);
//! ```

pub mod service;
pub mod ws;

pub use service::HttpBookingService;
pub use ws::WsSeatFeed;
