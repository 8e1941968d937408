//! Booking domain vocabulary.
//!
//! Identifier newtypes and the wire-level records exchanged with the booking
//! service. Field names and status strings follow the service's JSON format
//! exactly (`snake_case`, `temp_locked` for a seat held by another session),
//! so these types double as the serde layer for the HTTP and WebSocket
//! adapters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a trip (one scheduled departure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(u64);

impl TripId {
    /// Create a trip id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a seat, unique within a trip (e.g. `"3A"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Create a seat id from its raw value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeatId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque per-browser-session token correlating hold, release, and
/// reservation calls without requiring login.
///
/// Generated once when the flow starts and immutable for the lifetime of
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create from an existing token (e.g. restored from storage).
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a reservation, assigned by the booking service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(String);

impl ReservationId {
    /// Create a reservation id from its raw value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a seat as seen by this client.
///
/// The service only distinguishes `available`, `temp_locked`, and `reserved`;
/// `HeldByMe` is the client-side refinement of `temp_locked` for the one seat
/// this session holds. Snapshots arriving from the feed never carry it -
/// the inventory re-marks it after every replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    /// Free to select
    Available,
    /// Temporarily locked by another session
    #[serde(rename = "temp_locked")]
    HeldByOthers,
    /// Temporarily locked by this session
    HeldByMe,
    /// Sold or pending payment
    Reserved,
}

/// One seat of a trip's seat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Unique within the trip
    pub id: SeatId,
    /// Display label, row then letter (e.g. `"3A"`)
    pub seat_number: String,
    /// Row, starting at 1
    pub row_number: u32,
    /// Column letter, one of A-D
    pub seat_letter: char,
    /// Window seats sit in columns A and D
    pub is_window: bool,
    /// Current status
    pub status: SeatStatus,
}

impl Seat {
    /// Build a seat from its row and column, deriving the id, display
    /// number, and window flag.
    #[must_use]
    pub fn new(row_number: u32, seat_letter: char, status: SeatStatus) -> Self {
        let seat_number = format!("{row_number}{seat_letter}");
        Self {
            id: SeatId::new(seat_number.clone()),
            seat_number,
            row_number,
            seat_letter,
            is_window: matches!(seat_letter, 'A' | 'D'),
            status,
        }
    }
}

/// Passenger details collected in the second step of the flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerInfo {
    /// Full name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Contact email address
    pub email: String,
}

impl PassengerInfo {
    /// Create passenger details.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// First required field that is empty, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.phone.trim().is_empty() {
            Some("phone")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else {
            None
        }
    }
}

/// Payment method accepted by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit card
    #[default]
    CreditCard,
    /// Debit card
    DebitCard,
}

/// Card details collected in the payment step.
///
/// Validation here is presence only; format rules belong to the form layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Selected payment method
    pub method: PaymentMethod,
    /// Card number
    pub card_number: String,
    /// Name printed on the card
    pub card_name: String,
    /// Expiry, `MM/YY`
    pub expiry: String,
    /// Security code
    pub cvv: String,
}

impl CardDetails {
    /// First required field that is empty, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.card_number.trim().is_empty() {
            Some("card_number")
        } else if self.card_name.trim().is_empty() {
            Some("card_name")
        } else if self.expiry.trim().is_empty() {
            Some("expiry")
        } else if self.cvv.trim().is_empty() {
            Some("cvv")
        } else {
            None
        }
    }
}

/// Reservation record as returned by the service on creation.
///
/// `total_price` is carried as the decimal string the wire uses
/// (e.g. `"150.00"`); the flow never does arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Service-assigned reservation id
    pub id: ReservationId,
    /// Total price for display
    pub total_price: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_seats_are_columns_a_and_d() {
        assert!(Seat::new(3, 'A', SeatStatus::Available).is_window);
        assert!(!Seat::new(3, 'B', SeatStatus::Available).is_window);
        assert!(!Seat::new(3, 'C', SeatStatus::Available).is_window);
        assert!(Seat::new(3, 'D', SeatStatus::Available).is_window);
    }

    #[test]
    fn seat_id_matches_display_number() {
        let seat = Seat::new(12, 'C', SeatStatus::Reserved);
        assert_eq!(seat.id.as_str(), "12C");
        assert_eq!(seat.seat_number, "12C");
    }

    #[test]
    fn seat_status_uses_wire_names() {
        #[allow(clippy::unwrap_used)]
        let parsed: SeatStatus = serde_json::from_str("\"temp_locked\"").unwrap();
        assert_eq!(parsed, SeatStatus::HeldByOthers);

        #[allow(clippy::unwrap_used)]
        let rendered = serde_json::to_string(&SeatStatus::Available).unwrap();
        assert_eq!(rendered, "\"available\"");
    }

    #[test]
    fn passenger_reports_first_missing_field() {
        let mut passenger = PassengerInfo::new("Ayşe Yılmaz", "", "a@x.com");
        assert_eq!(passenger.missing_field(), Some("phone"));

        passenger.phone = "05321234567".to_string();
        assert_eq!(passenger.missing_field(), None);
    }

    #[test]
    fn card_reports_first_missing_field() {
        let card = CardDetails {
            method: PaymentMethod::CreditCard,
            card_number: "1234 5678 9012 3456".to_string(),
            card_name: "AYŞE YILMAZ".to_string(),
            expiry: "12/27".to_string(),
            cvv: String::new(),
        };
        assert_eq!(card.missing_field(), Some("cvv"));
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
