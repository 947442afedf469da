//! # Table Booking
//!
//! Restaurant table reservations backed by PostgreSQL.
//!
//! A reservation holds one table for a fixed two-hour window. A table can
//! carry any number of reservations over time, but never two confirmed ones
//! whose windows overlap. Booking a table marks it `Reserved`; cancelling or
//! completing the reservation sets it back to `Free`, in the same transaction.
//!
//! ## Core Modules
//!
//! - [`booking`]: Entities, availability search and reservation lifecycle
//! - [`db`]: Connection pool, migrations and repositories
//! - [`auth`]: Shared-secret API key check
//!
//! ## Example
//!
//! ```
//! use table_booking::booking::TimeSlot;
//!
//! let dinner = TimeSlot::parse("2025-07-01", "18:00").unwrap();
//! let late = TimeSlot::parse("2025-07-01", "20:00").unwrap();
//! assert!(!dinner.overlaps(&late));
//! ```

/// Shared-secret authorization.
pub mod auth;

/// Tables, reservations and booking rules.
pub mod booking;
pub use booking::{
    BookingError, BookingManager, BookingResult, Reservation, ReservationStatus, Table,
    TableState, TimeSlot,
};

/// Persistence.
pub mod db;
