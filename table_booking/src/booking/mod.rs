//! Booking module: tables, reservations and the rules that tie them together.
//!
//! This module implements:
//! - Fixed two-hour booking windows with half-open overlap detection
//! - Availability search by party size and time
//! - Reservation lifecycle (confirm, cancel, complete) with the table state
//!   updated in the same atomic write
//! - Manual table state override (`Free` / `Occupied` only)
//!
//! ## Example
//!
//! ```no_run
//! use table_booking::booking::{BookingManager, CreateReservationRequest};
//! use table_booking::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let booking = BookingManager::new(Arc::new(db.pool().clone()));
//!
//!     let reservation = booking
//!         .create_reservation(CreateReservationRequest {
//!             table_id: 1,
//!             date: "2025-07-01".to_string(),
//!             time: "18:00".to_string(),
//!             party_size: 2,
//!             customer_name: "Ada Lovelace".to_string(),
//!         })
//!         .await?;
//!     println!("Booked reservation {}", reservation.id);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod slot;

pub use errors::{BookingError, BookingResult, ErrorKind};
pub use manager::{BookingManager, DEMO_TABLES};
pub use models::{
    AvailabilityRequest, CreateReservationRequest, ManualTableState, NewReservation, Reservation,
    ReservationId, ReservationStatus, Table, TableId, TableState,
};
pub use slot::{RESERVATION_DURATION_HOURS, TimeSlot};
