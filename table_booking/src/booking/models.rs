//! Booking data models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::{BookingError, BookingResult};
use super::slot::TimeSlot;

/// Table ID type
pub type TableId = i64;

/// Reservation ID type
pub type ReservationId = i64;

/// Occupancy state of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TableState {
    #[default]
    Free,
    Occupied,
    Reserved,
}

impl TableState {
    /// Column value used in the `tables.state` column.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TableState::Free => "free",
            TableState::Occupied => "occupied",
            TableState::Reserved => "reserved",
        }
    }

    /// Parse a `tables.state` column value.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "free" => Some(TableState::Free),
            "occupied" => Some(TableState::Occupied),
            "reserved" => Some(TableState::Reserved),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableState::Free => write!(f, "Free"),
            TableState::Occupied => write!(f, "Occupied"),
            TableState::Reserved => write!(f, "Reserved"),
        }
    }
}

/// Table state an operator may set by hand.
///
/// `Reserved` is absent: it is only ever derived from a confirmed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualTableState {
    Free,
    Occupied,
}

impl FromStr for ManualTableState {
    type Err = BookingError;

    fn from_str(s: &str) -> BookingResult<Self> {
        match s {
            "Free" => Ok(ManualTableState::Free),
            "Occupied" => Ok(ManualTableState::Occupied),
            other => Err(BookingError::InvalidTableState(other.to_string())),
        }
    }
}

impl From<ManualTableState> for TableState {
    fn from(state: ManualTableState) -> Self {
        match state {
            ManualTableState::Free => TableState::Free,
            ManualTableState::Occupied => TableState::Occupied,
        }
    }
}

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Column value used in the `reservations.status` column.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a `reservations.status` column value.
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether no further transition is possible from this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Confirmed)
    }

    /// Validate a transition and return the new status.
    ///
    /// Only `Confirmed -> Completed` and `Confirmed -> Cancelled` are allowed.
    pub fn transition_to(self, target: ReservationStatus) -> BookingResult<ReservationStatus> {
        match (self, target) {
            (ReservationStatus::Confirmed, ReservationStatus::Completed)
            | (ReservationStatus::Confirmed, ReservationStatus::Cancelled) => Ok(target),
            (from, to) => Err(BookingError::InvalidTransition { from, to }),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Confirmed => write!(f, "Confirmed"),
            ReservationStatus::Completed => write!(f, "Completed"),
            ReservationStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Physical table model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub capacity: i32,
    pub state: TableState,
}

/// Reservation model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub table_id: TableId,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub party_size: i32,
    pub customer_name: String,
    pub status: ReservationStatus,
}

impl Reservation {
    /// The booked window.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.starts_at,
            end: self.ends_at,
        }
    }

    /// Whether this reservation blocks `slot` on its table.
    pub fn blocks(&self, slot: &TimeSlot) -> bool {
        self.status == ReservationStatus::Confirmed && self.slot().overlaps(slot)
    }
}

/// Availability query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub date: String,
    pub time: String,
    pub party_size: i32,
}

/// Reservation creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub table_id: TableId,
    pub date: String,
    pub time: String,
    pub party_size: i32,
    pub customer_name: String,
}

/// Validated reservation, ready to be written.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub table_id: TableId,
    pub slot: TimeSlot,
    pub party_size: i32,
    pub customer_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_state_parsing() {
        assert_eq!("Free".parse::<ManualTableState>().unwrap(), ManualTableState::Free);
        assert_eq!(
            "Occupied".parse::<ManualTableState>().unwrap(),
            ManualTableState::Occupied
        );
        assert!(matches!(
            "Reserved".parse::<ManualTableState>(),
            Err(BookingError::InvalidTableState(_))
        ));
        assert!("free".parse::<ManualTableState>().is_err());
    }

    #[test]
    fn test_db_round_trip_of_states() {
        for state in [TableState::Free, TableState::Occupied, TableState::Reserved] {
            assert_eq!(TableState::from_db_str(state.as_db_str()), Some(state));
        }
        for status in [
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::from_db_str(status.as_db_str()), Some(status));
        }
        assert_eq!(TableState::from_db_str("Reservada"), None);
    }

    #[test]
    fn test_only_confirmed_can_transition() {
        let confirmed = ReservationStatus::Confirmed;
        assert_eq!(
            confirmed.transition_to(ReservationStatus::Cancelled).unwrap(),
            ReservationStatus::Cancelled
        );
        assert_eq!(
            confirmed.transition_to(ReservationStatus::Completed).unwrap(),
            ReservationStatus::Completed
        );
        assert!(confirmed.transition_to(ReservationStatus::Confirmed).is_err());

        for terminal in [ReservationStatus::Completed, ReservationStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.transition_to(ReservationStatus::Cancelled).is_err());
            assert!(terminal.transition_to(ReservationStatus::Completed).is_err());
        }
    }

    #[test]
    fn test_state_json_names() {
        assert_eq!(serde_json::to_string(&TableState::Reserved).unwrap(), "\"Reserved\"");
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
    }
}
