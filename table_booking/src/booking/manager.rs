//! Booking manager: availability, reservation lifecycle and table state.

use sqlx::PgPool;
use std::sync::Arc;

use super::{
    errors::{BookingError, BookingResult},
    models::{
        AvailabilityRequest, CreateReservationRequest, ManualTableState, NewReservation,
        Reservation, ReservationId, ReservationStatus, Table, TableId,
    },
    slot::TimeSlot,
};
use crate::db::{BookingRepository, PgBookingRepository};

/// Tables created by [`BookingManager::seed_demo_tables`] on an empty database.
pub const DEMO_TABLES: [(&str, i32); 3] = [("Table 1", 2), ("Table 2", 4), ("Table 3", 6)];

/// Booking manager
#[derive(Clone)]
pub struct BookingManager {
    repository: Arc<dyn BookingRepository>,
}

impl BookingManager {
    /// Create a booking manager backed by PostgreSQL
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_repository(Arc::new(PgBookingRepository::new(pool)))
    }

    /// Create a booking manager over any repository
    pub fn with_repository(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    /// List every table
    pub async fn list_tables(&self) -> BookingResult<Vec<Table>> {
        self.repository.list_tables().await
    }

    /// Tables that can seat the party and have no confirmed reservation
    /// overlapping the two-hour window starting at `date time`.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidDateTime` - malformed date or time
    /// * `BookingError::InvalidPartySize` - party size is not positive
    pub async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> BookingResult<Vec<Table>> {
        let slot = TimeSlot::parse(&request.date, &request.time)?;
        validate_party_size(request.party_size)?;

        let tables = self
            .repository
            .available_tables(&slot, request.party_size)
            .await?;
        log::debug!(
            "{} table(s) free for {} guests at {}",
            tables.len(),
            request.party_size,
            slot.start
        );
        Ok(tables)
    }

    /// Book a table.
    ///
    /// The table's capacity is not compared with the party size here; that
    /// filter only applies to availability queries.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidDateTime` - malformed date or time
    /// * `BookingError::InvalidPartySize` - party size is not positive
    /// * `BookingError::InvalidCustomerName` - blank customer name
    /// * `BookingError::TableNotFound` - unknown table
    /// * `BookingError::SlotTaken` - overlapping confirmed reservation
    pub async fn create_reservation(
        &self,
        request: CreateReservationRequest,
    ) -> BookingResult<Reservation> {
        let slot = TimeSlot::parse(&request.date, &request.time)?;
        validate_party_size(request.party_size)?;
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(BookingError::InvalidCustomerName);
        }

        let new = NewReservation {
            table_id: request.table_id,
            slot,
            party_size: request.party_size,
            customer_name: customer_name.to_string(),
        };

        let reservation = self.repository.create_reservation(&new).await?;
        log::info!(
            "Reservation {} confirmed on table {} at {} for {} guests",
            reservation.id,
            reservation.table_id,
            reservation.starts_at,
            reservation.party_size
        );
        Ok(reservation)
    }

    /// Get a reservation
    pub async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        self.repository
            .find_reservation(reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound(reservation_id))
    }

    /// Cancel a confirmed reservation and free its table
    pub async fn cancel_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        self.close(reservation_id, ReservationStatus::Cancelled).await
    }

    /// Complete a confirmed reservation and free its table
    pub async fn complete_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Reservation> {
        self.close(reservation_id, ReservationStatus::Completed).await
    }

    async fn close(
        &self,
        reservation_id: ReservationId,
        outcome: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .repository
            .close_reservation(reservation_id, outcome)
            .await?;
        log::info!(
            "Reservation {} {}, table {} is free",
            reservation.id,
            reservation.status,
            reservation.table_id
        );
        Ok(reservation)
    }

    /// Manually set a table to `Free` or `Occupied`.
    ///
    /// Existing reservations are neither checked nor changed.
    ///
    /// # Errors
    ///
    /// * `BookingError::TableNotFound` - unknown table (checked first)
    /// * `BookingError::InvalidTableState` - anything but `Free` or `Occupied`
    pub async fn set_table_state(&self, table_id: TableId, state: &str) -> BookingResult<Table> {
        self.repository
            .find_table(table_id)
            .await?
            .ok_or(BookingError::TableNotFound(table_id))?;
        let state: ManualTableState = state.parse()?;

        let table = self
            .repository
            .update_table_state(table_id, state.into())
            .await?;
        log::info!("Table {} manually set to {}", table.id, table.state);
        Ok(table)
    }

    /// Insert [`DEMO_TABLES`] when no table exists yet.
    ///
    /// Returns the number of tables created.
    pub async fn seed_demo_tables(&self) -> BookingResult<usize> {
        if self.repository.count_tables().await? > 0 {
            log::debug!("Tables already present, skipping demo seed");
            return Ok(0);
        }

        for (name, capacity) in DEMO_TABLES {
            self.repository.insert_table(name, capacity).await?;
        }
        log::info!("Seeded {} demo tables", DEMO_TABLES.len());
        Ok(DEMO_TABLES.len())
    }

    /// Check the backing store is reachable
    pub async fn health_check(&self) -> BookingResult<()> {
        self.repository.ping().await
    }
}

fn validate_party_size(party_size: i32) -> BookingResult<()> {
    if party_size <= 0 {
        return Err(BookingError::InvalidPartySize(party_size));
    }
    Ok(())
}
