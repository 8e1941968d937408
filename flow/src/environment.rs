//! Environment for the booking flow reducer.
//!
//! All side-effecting collaborators are injected here: the clock, the
//! booking service client, the immutable session identifier, and the hold
//! durations. Production wires the HTTP adapter and system clock; tests
//! wire the scripted service and a fixed clock - the reducer cannot tell
//! the difference.

use crate::types::FlowConfig;
use bilet_core::booking::SessionId;
use bilet_core::environment::Clock;
use bilet_core::service::BookingService;
use std::sync::Arc;

/// Dependencies for the booking flow reducer.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Clock for reservation expiry timestamps
    pub clock: Arc<dyn Clock>,
    /// Booking service the flow's effects call
    pub service: Arc<dyn BookingService>,
    /// Session token correlating this browser session's calls.
    ///
    /// Generated once, immutable for the lifetime of the session.
    pub session_id: SessionId,
    /// Hold durations
    pub config: FlowConfig,
}

impl BookingEnvironment {
    /// Create an environment.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        service: Arc<dyn BookingService>,
        session_id: SessionId,
        config: FlowConfig,
    ) -> Self {
        Self {
            clock,
            service,
            session_id,
            config,
        }
    }
}

impl std::fmt::Debug for BookingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingEnvironment")
            .field("session_id", &self.session_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
