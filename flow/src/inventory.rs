//! Seat inventory snapshot.
//!
//! The snapshot is the client's view of every seat of one trip. It is
//! replaced wholesale by each push message and never patched incrementally;
//! seat counts per trip are small (tens of seats), so resending the full
//! list costs little and removes every merge-conflict edge case.
//!
//! The feed reports this session's own temporary lock as `temp_locked` like
//! anyone else's; after each replacement the seat the session holds is
//! re-marked [`SeatStatus::HeldByMe`], so at most one seat ever carries that
//! status.

use bilet_core::booking::{Seat, SeatId, SeatStatus};
use serde::{Deserialize, Serialize};

/// The seat list for one trip, plus the state of the feed delivering it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    seats: Vec<Seat>,
    feed_lost: bool,
}

impl InventoryState {
    /// Create an empty snapshot (nothing received yet).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seats: Vec::new(),
            feed_lost: false,
        }
    }

    /// All seats in display order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Look up a seat by id.
    #[must_use]
    pub fn seat(&self, id: &SeatId) -> Option<&Seat> {
        self.seats.iter().find(|s| &s.id == id)
    }

    /// Number of seats currently available for selection.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .count()
    }

    /// Whether the push feed has been lost; the snapshot may be stale.
    #[must_use]
    pub const fn is_feed_lost(&self) -> bool {
        self.feed_lost
    }

    /// Record that the push feed dropped.
    pub const fn mark_feed_lost(&mut self) {
        self.feed_lost = true;
    }

    /// Replace the snapshot wholesale with a pushed seat list.
    ///
    /// Incoming seats never legitimately carry `HeldByMe`; any that do are
    /// demoted before the session's own held seat (if any, and if the feed
    /// still shows its lock) is re-marked. This keeps the single-held-seat
    /// invariant independent of what arrives on the wire.
    pub fn replace(&mut self, seats: Vec<Seat>, held: Option<&SeatId>) {
        self.seats = seats;
        for seat in &mut self.seats {
            if seat.status == SeatStatus::HeldByMe {
                seat.status = SeatStatus::HeldByOthers;
            }
        }
        if let Some(held_id) = held {
            if let Some(seat) = self.seats.iter_mut().find(|s| &s.id == held_id) {
                if seat.status == SeatStatus::HeldByOthers {
                    seat.status = SeatStatus::HeldByMe;
                }
            }
        }
    }

    /// Optimistically mark a seat as held by this session.
    ///
    /// Any previously held seat reverts to available; the authoritative
    /// statuses arrive with the next push replacement.
    pub fn mark_held(&mut self, id: &SeatId) {
        for seat in &mut self.seats {
            if seat.status == SeatStatus::HeldByMe {
                seat.status = SeatStatus::Available;
            }
        }
        if let Some(seat) = self.seats.iter_mut().find(|s| &s.id == id) {
            seat.status = SeatStatus::HeldByMe;
        }
    }

    /// Revert the held seat (if any) to available.
    pub fn clear_held(&mut self) {
        for seat in &mut self.seats {
            if seat.status == SeatStatus::HeldByMe {
                seat.status = SeatStatus::Available;
            }
        }
    }

    /// Number of seats marked held by this session (0 or 1 by invariant).
    #[must_use]
    pub fn held_by_me_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::HeldByMe)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat_list() -> Vec<Seat> {
        vec![
            Seat::new(1, 'A', SeatStatus::Available),
            Seat::new(1, 'B', SeatStatus::HeldByOthers),
            Seat::new(1, 'C', SeatStatus::Reserved),
            Seat::new(1, 'D', SeatStatus::Available),
        ]
    }

    #[test]
    fn replace_swaps_the_whole_snapshot() {
        let mut inventory = InventoryState::new();
        inventory.replace(seat_list(), None);
        assert_eq!(inventory.seats().len(), 4);
        assert_eq!(inventory.available_count(), 2);

        inventory.replace(vec![Seat::new(2, 'A', SeatStatus::Available)], None);
        assert_eq!(inventory.seats().len(), 1);
    }

    #[test]
    fn replace_remarks_the_held_seat() {
        let mut inventory = InventoryState::new();
        let held = SeatId::from("1B");
        inventory.replace(seat_list(), Some(&held));

        #[allow(clippy::unwrap_used)]
        let seat = inventory.seat(&held).unwrap();
        assert_eq!(seat.status, SeatStatus::HeldByMe);
        assert_eq!(inventory.held_by_me_count(), 1);
    }

    #[test]
    fn replace_does_not_remark_a_reserved_seat() {
        let mut inventory = InventoryState::new();
        let held = SeatId::from("1C");
        inventory.replace(seat_list(), Some(&held));

        #[allow(clippy::unwrap_used)]
        let seat = inventory.seat(&held).unwrap();
        assert_eq!(seat.status, SeatStatus::Reserved);
        assert_eq!(inventory.held_by_me_count(), 0);
    }

    #[test]
    fn replace_demotes_wire_held_by_me() {
        let mut inventory = InventoryState::new();
        let seats = vec![
            Seat::new(1, 'A', SeatStatus::HeldByMe),
            Seat::new(1, 'B', SeatStatus::HeldByMe),
        ];
        inventory.replace(seats, None);
        assert_eq!(inventory.held_by_me_count(), 0);
    }

    #[test]
    fn mark_held_moves_the_hold() {
        let mut inventory = InventoryState::new();
        inventory.replace(seat_list(), None);

        inventory.mark_held(&SeatId::from("1A"));
        assert_eq!(inventory.held_by_me_count(), 1);

        inventory.mark_held(&SeatId::from("1D"));
        assert_eq!(inventory.held_by_me_count(), 1);
        #[allow(clippy::unwrap_used)]
        let old = inventory.seat(&SeatId::from("1A")).unwrap();
        assert_eq!(old.status, SeatStatus::Available);
    }

    #[test]
    fn clear_held_reverts_to_available() {
        let mut inventory = InventoryState::new();
        inventory.replace(seat_list(), None);
        inventory.mark_held(&SeatId::from("1A"));

        inventory.clear_held();
        assert_eq!(inventory.held_by_me_count(), 0);
        assert_eq!(inventory.available_count(), 2);
    }
}
