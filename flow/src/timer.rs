//! Hold countdown.
//!
//! A single countdown is associated with the active hold: five minutes for a
//! seat hold, fifteen for a pending reservation. The countdown is driven by
//! one-second delay effects carrying the timer's generation number; the
//! reducer drops ticks whose generation no longer matches, so starting a new
//! countdown implicitly cancels the old one and exactly one expiry fires per
//! continuous hold.

use serde::{Deserialize, Serialize};

/// What the running countdown is protecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldKind {
    /// Temporary seat lock taken at seat selection
    SeatHold,
    /// Pending reservation awaiting payment
    PaymentHold,
}

/// A running countdown over whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldTimer {
    kind: HoldKind,
    remaining_seconds: u32,
    generation: u64,
}

impl HoldTimer {
    /// Start a countdown of `seconds` whole seconds.
    #[must_use]
    pub const fn new(kind: HoldKind, seconds: u32, generation: u64) -> Self {
        Self {
            kind,
            remaining_seconds: seconds,
            generation,
        }
    }

    /// What this countdown protects.
    #[must_use]
    pub const fn kind(&self) -> HoldKind {
        self.kind
    }

    /// Seconds left before expiry.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Generation number identifying this countdown instance.
    ///
    /// Ticks carry the generation they were armed for; a mismatch means the
    /// countdown was replaced or cancelled and the tick must be dropped.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `true` when the countdown has reached zero and the hold has
    /// expired.
    pub const fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Remaining time formatted `M:SS` for display.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_down_to_expiry() {
        let mut timer = HoldTimer::new(HoldKind::SeatHold, 3, 1);
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn tick_saturates_at_zero() {
        let mut timer = HoldTimer::new(HoldKind::PaymentHold, 1, 1);
        assert!(timer.tick());
        assert!(timer.tick());
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn remaining_formats_minutes_and_seconds() {
        let timer = HoldTimer::new(HoldKind::SeatHold, 300, 1);
        assert_eq!(timer.format_remaining(), "5:00");

        let timer = HoldTimer::new(HoldKind::SeatHold, 61, 1);
        assert_eq!(timer.format_remaining(), "1:01");

        let timer = HoldTimer::new(HoldKind::SeatHold, 9, 1);
        assert_eq!(timer.format_remaining(), "0:09");
    }
}
