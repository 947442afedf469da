//! Table API handlers.
//!
//! - Listing all tables with their current state (public)
//! - Searching free tables for a party size and time (API key)
//! - Manually setting a table to `Free` or `Occupied` (API key)
//!
//! # Examples
//!
//! List all tables:
//! ```bash
//! curl http://localhost:8000/tables
//! ```
//!
//! Find a table for four at 19:00:
//! ```bash
//! curl -X POST http://localhost:8000/availability \
//!   -H "x-api-key: $API_KEY" \
//!   -H "Content-Type: application/json" \
//!   -d '{"date": "2025-07-01", "time": "19:00", "party_size": 4}'
//! ```

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::{Deserialize, Serialize};
use table_booking::booking::{AvailabilityRequest, Table, TableId};

use super::{ApiError, AppState, error_response, rejected_body, rejected_path};

#[derive(Debug, Deserialize)]
pub struct UpdateTableStateRequest {
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct TableStateResponse {
    pub message: String,
    pub table: Table,
}

/// List all tables.
///
/// # Response
///
/// Returns `200 OK` with every table ordered by id:
/// ```json
/// [
///   {"id": 1, "name": "Table 1", "capacity": 2, "state": "Free"},
///   {"id": 2, "name": "Table 2", "capacity": 4, "state": "Reserved"}
/// ]
/// ```
///
/// # Errors
///
/// - `500 Internal Server Error`: Database error
pub async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<Table>>, ApiError> {
    state
        .booking
        .list_tables()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Find tables free for a two-hour window.
///
/// Returns tables with capacity of at least `party_size` that have no
/// confirmed reservation overlapping `[time, time + 2h)`. A reservation ending
/// exactly at `time` does not block.
///
/// # Request Body
///
/// ```json
/// {"date": "2025-07-01", "time": "18:00", "party_size": 2}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed date/time or non-positive party size
/// - `401 Unauthorized`: Missing or wrong API key
pub async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<Vec<Table>>, ApiError> {
    let Json(request) = payload.map_err(rejected_body)?;

    state
        .booking
        .check_availability(&request)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Manually set a table's state.
///
/// Only `Free` and `Occupied` are accepted; `Reserved` is set by bookings
/// alone. Reservations on the table are not touched.
///
/// # Request Body
///
/// ```json
/// {"state": "Occupied"}
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Table state updated to Occupied",
///   "table": {"id": 1, "name": "Table 1", "capacity": 2, "state": "Occupied"}
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-integer id, or state other than `Free`/`Occupied`
/// - `401 Unauthorized`: Missing or wrong API key
/// - `404 Not Found`: Table doesn't exist
pub async fn update_table_state(
    State(state): State<AppState>,
    table_id: Result<Path<TableId>, PathRejection>,
    payload: Result<Json<UpdateTableStateRequest>, JsonRejection>,
) -> Result<Json<TableStateResponse>, ApiError> {
    let Path(table_id) = table_id.map_err(rejected_path)?;
    let Json(request) = payload.map_err(rejected_body)?;

    let table = state
        .booking
        .set_table_state(table_id, &request.state)
        .await
        .map_err(error_response)?;

    Ok(Json(TableStateResponse {
        message: format!("Table state updated to {}", table.state),
        table,
    }))
}
