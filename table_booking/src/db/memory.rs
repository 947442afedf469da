//! In-memory `BookingRepository`.
//!
//! Used by the test suites.
//! Every mutation holds one lock for its whole duration, which gives the
//! same all-or-nothing behaviour as the PostgreSQL transactions.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use super::repository::BookingRepository;
use crate::booking::{
    BookingError, BookingResult, NewReservation, Reservation, ReservationId, ReservationStatus,
    Table, TableId, TableState, TimeSlot,
};

#[derive(Default)]
struct Store {
    tables: BTreeMap<TableId, Table>,
    reservations: BTreeMap<ReservationId, Reservation>,
    last_table_id: TableId,
    last_reservation_id: ReservationId,
}

impl Store {
    fn first_conflict(&self, table_id: TableId, slot: &TimeSlot) -> Option<&Reservation> {
        self.reservations
            .values()
            .filter(|r| r.table_id == table_id && r.blocks(slot))
            .min_by_key(|r| r.starts_at)
    }
}

/// Mutex-guarded in-memory store
#[derive(Default)]
pub struct MemoryBookingRepository {
    store: Mutex<Store>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload tables, e.g. `&[("Table 1", 2), ("Table 2", 4)]`.
    pub fn with_tables(tables: &[(&str, i32)]) -> Self {
        let mut store = Store::default();
        for (name, capacity) in tables {
            store.last_table_id += 1;
            let id = store.last_table_id;
            store.tables.insert(
                id,
                Table {
                    id,
                    name: name.to_string(),
                    capacity: *capacity,
                    state: TableState::Free,
                },
            );
        }
        Self {
            store: Mutex::new(store),
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn list_tables(&self) -> BookingResult<Vec<Table>> {
        Ok(self.store.lock().await.tables.values().cloned().collect())
    }

    async fn find_table(&self, table_id: TableId) -> BookingResult<Option<Table>> {
        Ok(self.store.lock().await.tables.get(&table_id).cloned())
    }

    async fn count_tables(&self) -> BookingResult<i64> {
        Ok(self.store.lock().await.tables.len() as i64)
    }

    async fn insert_table(&self, name: &str, capacity: i32) -> BookingResult<Table> {
        let mut store = self.store.lock().await;
        if store.tables.values().any(|t| t.name == name) {
            return Err(BookingError::TableNameTaken(name.to_string()));
        }

        store.last_table_id += 1;
        let table = Table {
            id: store.last_table_id,
            name: name.to_string(),
            capacity,
            state: TableState::Free,
        };
        store.tables.insert(table.id, table.clone());
        Ok(table)
    }

    async fn update_table_state(
        &self,
        table_id: TableId,
        state: TableState,
    ) -> BookingResult<Table> {
        let mut store = self.store.lock().await;
        let table = store
            .tables
            .get_mut(&table_id)
            .ok_or(BookingError::TableNotFound(table_id))?;
        table.state = state;
        Ok(table.clone())
    }

    async fn available_tables(
        &self,
        slot: &TimeSlot,
        party_size: i32,
    ) -> BookingResult<Vec<Table>> {
        let store = self.store.lock().await;
        Ok(store
            .tables
            .values()
            .filter(|t| t.capacity >= party_size)
            .filter(|t| store.first_conflict(t.id, slot).is_none())
            .cloned()
            .collect())
    }

    async fn find_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> BookingResult<Option<Reservation>> {
        Ok(self
            .store
            .lock()
            .await
            .reservations
            .get(&reservation_id)
            .cloned())
    }

    async fn create_reservation(&self, new: &NewReservation) -> BookingResult<Reservation> {
        let mut store = self.store.lock().await;
        if !store.tables.contains_key(&new.table_id) {
            return Err(BookingError::TableNotFound(new.table_id));
        }
        if let Some(existing) = store.first_conflict(new.table_id, &new.slot) {
            return Err(BookingError::SlotTaken {
                table_id: new.table_id,
                conflicting_id: existing.id,
            });
        }

        store.last_reservation_id += 1;
        let reservation = Reservation {
            id: store.last_reservation_id,
            table_id: new.table_id,
            starts_at: new.slot.start,
            ends_at: new.slot.end,
            party_size: new.party_size,
            customer_name: new.customer_name.clone(),
            status: ReservationStatus::Confirmed,
        };
        store.reservations.insert(reservation.id, reservation.clone());
        if let Some(table) = store.tables.get_mut(&new.table_id) {
            table.state = TableState::Reserved;
        }
        Ok(reservation)
    }

    async fn close_reservation(
        &self,
        reservation_id: ReservationId,
        outcome: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let mut store = self.store.lock().await;
        let reservation = store
            .reservations
            .get_mut(&reservation_id)
            .ok_or(BookingError::ReservationNotFound(reservation_id))?;
        reservation.status = reservation.status.transition_to(outcome)?;
        let closed = reservation.clone();

        if let Some(table) = store.tables.get_mut(&closed.table_id) {
            table.state = TableState::Free;
        }
        Ok(closed)
    }

    async fn ping(&self) -> BookingResult<()> {
        Ok(())
    }
}
