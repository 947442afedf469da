//! Booking error types.

use thiserror::Error;

use super::models::{ReservationId, ReservationStatus, TableId};
use crate::db::timeouts::TimeoutError;

/// Booking errors
#[derive(Debug, Error)]
pub enum BookingError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database operation exceeded its deadline
    #[error("Database operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Stored row holds a value the model cannot represent
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Date or time could not be parsed
    #[error("Invalid date or time format: '{date} {time}' (expected YYYY-MM-DD and HH:MM)")]
    InvalidDateTime { date: String, time: String },

    /// Party size must be positive
    #[error("Invalid party size: {0}")]
    InvalidPartySize(i32),

    /// Customer name is empty
    #[error("Customer name must not be empty")]
    InvalidCustomerName,

    /// Requested table state is not one of Free/Occupied
    #[error("Invalid table state '{0}': must be 'Free' or 'Occupied'")]
    InvalidTableState(String),

    /// Table not found
    #[error("Table {0} not found")]
    TableNotFound(TableId),

    /// Another table already uses this name
    #[error("Table name '{0}' is already taken")]
    TableNameTaken(String),

    /// Reservation not found
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    /// A confirmed reservation already covers part of the window
    #[error("Table {table_id} is already reserved for that time (reservation {conflicting_id})")]
    SlotTaken {
        table_id: TableId,
        conflicting_id: ReservationId,
    },

    /// Status change not allowed from the current status
    #[error("Reservation cannot move from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
}

/// Broad class of a booking error, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::InvalidDateTime { .. }
            | BookingError::InvalidPartySize(_)
            | BookingError::InvalidCustomerName
            | BookingError::InvalidTableState(_) => ErrorKind::Validation,
            BookingError::TableNotFound(_) | BookingError::ReservationNotFound(_) => {
                ErrorKind::NotFound
            }
            BookingError::SlotTaken { .. }
            | BookingError::InvalidTransition { .. }
            | BookingError::TableNameTaken(_) => ErrorKind::Conflict,
            BookingError::Database(_) | BookingError::Timeout(_) | BookingError::CorruptRow(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database failures are collapsed into a generic message.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<TimeoutError> for BookingError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => BookingError::Timeout(duration),
            TimeoutError::Database(e) => BookingError::Database(e),
        }
    }
}

/// Result type for booking operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(BookingError::InvalidPartySize(0).kind(), ErrorKind::Validation);
        assert_eq!(BookingError::TableNotFound(999).kind(), ErrorKind::NotFound);
        assert_eq!(
            BookingError::SlotTaken {
                table_id: 1,
                conflicting_id: 2
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            BookingError::Timeout(std::time::Duration::from_secs(5)).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_client_message_hides_database_details() {
        let err = BookingError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = BookingError::InvalidTableState("Reserved".to_string());
        assert!(err.client_message().contains("Reserved"));
    }
}
