//! Repository trait for booking persistence and its PostgreSQL implementation.
//!
//! Operations that touch both a reservation and its table are single methods
//! so that each implementation can apply them atomically.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use std::time::Instant;

use super::timeouts::{DEFAULT_TRANSACTION_TIMEOUT, with_deadline, with_default_timeout};
use crate::booking::{
    BookingError, BookingResult, NewReservation, Reservation, ReservationId, ReservationStatus,
    Table, TableId, TableState, TimeSlot,
};

/// Trait for booking repository operations
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// All tables ordered by id
    async fn list_tables(&self) -> BookingResult<Vec<Table>>;

    /// Find table by ID
    async fn find_table(&self, table_id: TableId) -> BookingResult<Option<Table>>;

    /// Number of tables
    async fn count_tables(&self) -> BookingResult<i64>;

    /// Create a table in the `Free` state
    async fn insert_table(&self, name: &str, capacity: i32) -> BookingResult<Table>;

    /// Overwrite a table's state without looking at its reservations
    async fn update_table_state(&self, table_id: TableId, state: TableState)
    -> BookingResult<Table>;

    /// Tables seating at least `party_size` with no confirmed reservation
    /// overlapping `slot`, ordered by id
    async fn available_tables(&self, slot: &TimeSlot, party_size: i32)
    -> BookingResult<Vec<Table>>;

    /// Find reservation by ID
    async fn find_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Option<Reservation>>;

    /// Atomically check the table for overlaps, insert a confirmed
    /// reservation and mark the table `Reserved`.
    ///
    /// # Errors
    ///
    /// * `BookingError::TableNotFound` - table does not exist
    /// * `BookingError::SlotTaken` - a confirmed reservation overlaps
    async fn create_reservation(&self, new: &NewReservation) -> BookingResult<Reservation>;

    /// Atomically move a reservation to `outcome` and free its table.
    ///
    /// # Errors
    ///
    /// * `BookingError::ReservationNotFound` - reservation does not exist
    /// * `BookingError::InvalidTransition` - reservation is not confirmed
    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        outcome: ReservationStatus,
    ) -> BookingResult<Reservation>;

    /// Cheap round trip to the backing store
    async fn ping(&self) -> BookingResult<()>;
}

const TABLE_COLUMNS: &str = "id, name, capacity, state";
const RESERVATION_COLUMNS: &str =
    "id, table_id, starts_at, ends_at, party_size, customer_name, status";

/// Default PostgreSQL implementation of `BookingRepository`
pub struct PgBookingRepository {
    pool: Arc<PgPool>,
}

impl PgBookingRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn log_query(operation: &str, started: Instant) {
        let elapsed = started.elapsed().as_millis() as u64;
        if elapsed > 100 {
            log::warn!("Slow booking query: {} took {}ms", operation, elapsed);
        } else {
            log::debug!("Booking query: {} took {}ms", operation, elapsed);
        }
    }
}

fn table_from_row(row: &PgRow) -> BookingResult<Table> {
    let raw_state: String = row.try_get("state")?;
    let state = TableState::from_db_str(&raw_state)
        .ok_or_else(|| BookingError::CorruptRow(format!("unknown table state '{raw_state}'")))?;

    Ok(Table {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        capacity: row.try_get("capacity")?,
        state,
    })
}

fn reservation_from_row(row: &PgRow) -> BookingResult<Reservation> {
    let raw_status: String = row.try_get("status")?;
    let status = ReservationStatus::from_db_str(&raw_status).ok_or_else(|| {
        BookingError::CorruptRow(format!("unknown reservation status '{raw_status}'"))
    })?;

    Ok(Reservation {
        id: row.try_get("id")?,
        table_id: row.try_get("table_id")?,
        starts_at: row.try_get("starts_at")?,
        ends_at: row.try_get("ends_at")?,
        party_size: row.try_get("party_size")?,
        customer_name: row.try_get("customer_name")?,
        status,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list_tables(&self) -> BookingResult<Vec<Table>> {
        let started = Instant::now();
        let rows = with_default_timeout(
            sqlx::query(&format!("SELECT {TABLE_COLUMNS} FROM tables ORDER BY id"))
                .fetch_all(self.pool.as_ref()),
        )
        .await?;
        Self::log_query("list_tables", started);

        rows.iter().map(table_from_row).collect()
    }

    async fn find_table(&self, table_id: TableId) -> BookingResult<Option<Table>> {
        let row = with_default_timeout(
            sqlx::query(&format!("SELECT {TABLE_COLUMNS} FROM tables WHERE id = $1"))
                .bind(table_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        row.as_ref().map(table_from_row).transpose()
    }

    async fn count_tables(&self) -> BookingResult<i64> {
        let row = with_default_timeout(
            sqlx::query("SELECT COUNT(*) AS count FROM tables").fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.try_get("count")?)
    }

    async fn insert_table(&self, name: &str, capacity: i32) -> BookingResult<Table> {
        let result = with_default_timeout(
            sqlx::query(&format!(
                "INSERT INTO tables (name, capacity, state) VALUES ($1, $2, $3)
                 RETURNING {TABLE_COLUMNS}"
            ))
            .bind(name)
            .bind(capacity)
            .bind(TableState::Free.as_db_str())
            .fetch_one(self.pool.as_ref()),
        )
        .await;

        match result {
            Ok(row) => table_from_row(&row),
            Err(super::timeouts::TimeoutError::Database(e)) if is_unique_violation(&e) => {
                Err(BookingError::TableNameTaken(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_table_state(
        &self,
        table_id: TableId,
        state: TableState,
    ) -> BookingResult<Table> {
        let row = with_default_timeout(
            sqlx::query(&format!(
                "UPDATE tables SET state = $2 WHERE id = $1 RETURNING {TABLE_COLUMNS}"
            ))
            .bind(table_id)
            .bind(state.as_db_str())
            .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or(BookingError::TableNotFound(table_id))?;

        table_from_row(&row)
    }

    async fn available_tables(
        &self,
        slot: &TimeSlot,
        party_size: i32,
    ) -> BookingResult<Vec<Table>> {
        let started = Instant::now();
        let rows = with_default_timeout(
            sqlx::query(
                r#"
                SELECT t.id, t.name, t.capacity, t.state
                FROM tables t
                WHERE t.capacity >= $1
                  AND NOT EXISTS (
                      SELECT 1 FROM reservations r
                      WHERE r.table_id = t.id
                        AND r.status = $2
                        AND r.starts_at < $4
                        AND r.ends_at > $3
                  )
                ORDER BY t.id
                "#,
            )
            .bind(party_size)
            .bind(ReservationStatus::Confirmed.as_db_str())
            .bind(slot.start)
            .bind(slot.end)
            .fetch_all(self.pool.as_ref()),
        )
        .await?;
        Self::log_query("available_tables", started);

        rows.iter().map(table_from_row).collect()
    }

    async fn find_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Option<Reservation>> {
        let row = with_default_timeout(
            sqlx::query(&format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
            ))
            .bind(reservation_id)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        row.as_ref().map(reservation_from_row).transpose()
    }

    async fn create_reservation(&self, new: &NewReservation) -> BookingResult<Reservation> {
        let started = Instant::now();
        let reservation = with_deadline(DEFAULT_TRANSACTION_TIMEOUT, async {
            let mut tx = self.pool.begin().await?;

            // The row lock serializes concurrent bookings of the same table.
            sqlx::query("SELECT id FROM tables WHERE id = $1 FOR UPDATE")
                .bind(new.table_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(BookingError::TableNotFound(new.table_id))?;

            let conflict = sqlx::query(
                "SELECT id FROM reservations
                 WHERE table_id = $1 AND status = $2 AND starts_at < $4 AND ends_at > $3
                 ORDER BY starts_at
                 LIMIT 1",
            )
            .bind(new.table_id)
            .bind(ReservationStatus::Confirmed.as_db_str())
            .bind(new.slot.start)
            .bind(new.slot.end)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = conflict {
                return Err(BookingError::SlotTaken {
                    table_id: new.table_id,
                    conflicting_id: row.try_get("id")?,
                });
            }

            let row = sqlx::query(&format!(
                "INSERT INTO reservations
                     (table_id, starts_at, ends_at, party_size, customer_name, status)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {RESERVATION_COLUMNS}"
            ))
            .bind(new.table_id)
            .bind(new.slot.start)
            .bind(new.slot.end)
            .bind(new.party_size)
            .bind(&new.customer_name)
            .bind(ReservationStatus::Confirmed.as_db_str())
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE tables SET state = $2 WHERE id = $1")
                .bind(new.table_id)
                .bind(TableState::Reserved.as_db_str())
                .execute(&mut *tx)
                .await?;

            let reservation = reservation_from_row(&row)?;
            tx.commit().await?;
            Ok::<_, BookingError>(reservation)
        })
        .await?;
        Self::log_query("create_reservation", started);

        Ok(reservation)
    }

    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        outcome: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let started = Instant::now();
        let reservation = with_deadline(DEFAULT_TRANSACTION_TIMEOUT, async {
            let mut tx = self.pool.begin().await?;

            let table_id: TableId =
                sqlx::query("SELECT table_id FROM reservations WHERE id = $1")
                    .bind(reservation_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or(BookingError::ReservationNotFound(reservation_id))?
                    .try_get("table_id")?;

            // Lock order is table then reservation, same as creation.
            sqlx::query("SELECT id FROM tables WHERE id = $1 FOR UPDATE")
                .bind(table_id)
                .execute(&mut *tx)
                .await?;

            let row = sqlx::query(&format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE"
            ))
            .bind(reservation_id)
            .fetch_one(&mut *tx)
            .await?;
            let current = reservation_from_row(&row)?;
            let next = current.status.transition_to(outcome)?;

            let row = sqlx::query(&format!(
                "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {RESERVATION_COLUMNS}"
            ))
            .bind(reservation_id)
            .bind(next.as_db_str())
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE tables SET state = $2 WHERE id = $1")
                .bind(table_id)
                .bind(TableState::Free.as_db_str())
                .execute(&mut *tx)
                .await?;

            let reservation = reservation_from_row(&row)?;
            tx.commit().await?;
            Ok::<_, BookingError>(reservation)
        })
        .await?;
        Self::log_query("close_reservation", started);

        Ok(reservation)
    }

    async fn ping(&self) -> BookingResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(self.pool.as_ref())).await?;
        Ok(())
    }
}
