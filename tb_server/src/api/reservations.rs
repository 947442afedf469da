//! Reservation API handlers.
//!
//! Booking, lookup, cancellation and completion. Every reservation holds its
//! table for two hours from the requested time.
//!
//! # Examples
//!
//! Book table 1:
//! ```bash
//! curl -X POST http://localhost:8000/reservations \
//!   -H "x-api-key: $API_KEY" \
//!   -H "Content-Type: application/json" \
//!   -d '{"table_id": 1, "date": "2025-07-01", "time": "18:00", "party_size": 2, "customer_name": "Ada"}'
//! ```
//!
//! Cancel it:
//! ```bash
//! curl -X PUT http://localhost:8000/reservations/1/cancel -H "x-api-key: $API_KEY"
//! ```

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use table_booking::booking::{
    BookingError, BookingResult, CreateReservationRequest, Reservation, ReservationId,
};

use super::{
    ApiError, AppState, error_response, rejected_body, rejected_path, request_id::RequestId,
};
use crate::{logging, metrics};

/// Book a table.
///
/// # Request Body
///
/// ```json
/// {
///   "table_id": 1,
///   "date": "2025-07-01",
///   "time": "18:00",
///   "party_size": 2,
///   "customer_name": "Ada Lovelace"
/// }
/// ```
///
/// # Response
///
/// Returns `200 OK` with the confirmed reservation:
/// ```json
/// {
///   "id": 7,
///   "table_id": 1,
///   "starts_at": "2025-07-01T18:00:00",
///   "ends_at": "2025-07-01T20:00:00",
///   "party_size": 2,
///   "customer_name": "Ada Lovelace",
///   "status": "Confirmed"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed input, or the table is already booked for
///   an overlapping window
/// - `401 Unauthorized`: Missing or wrong API key
/// - `404 Not Found`: Table doesn't exist
///
/// # Notes
///
/// - The table's capacity is not checked against the party size here; use
///   `/availability` to find a table that fits
pub async fn create_reservation(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let Json(request) = payload.map_err(rejected_body)?;

    match state.booking.create_reservation(request).await {
        Ok(reservation) => {
            metrics::reservations_created_total();
            logging::log_booking_event("created", reservation.id, reservation.table_id);
            Ok(Json(reservation))
        }
        Err(e) => {
            if matches!(e, BookingError::SlotTaken { .. }) {
                metrics::reservation_conflicts_total();
                tracing::info!(request_id = %request_id.as_str(), "Booking conflict: {}", e);
            }
            Err(error_response(e))
        }
    }
}

/// Get a reservation by id.
///
/// # Errors
///
/// - `400 Bad Request`: Id is not an integer
/// - `404 Not Found`: Reservation doesn't exist
pub async fn get_reservation(
    State(state): State<AppState>,
    reservation_id: Result<Path<ReservationId>, PathRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let Path(reservation_id) = reservation_id.map_err(rejected_path)?;

    state
        .booking
        .get_reservation(reservation_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Cancel a confirmed reservation and free its table.
///
/// # Errors
///
/// - `400 Bad Request`: Id is not an integer, or the reservation is already
///   completed or cancelled
/// - `401 Unauthorized`: Missing or wrong API key
/// - `404 Not Found`: Reservation doesn't exist
pub async fn cancel_reservation(
    State(state): State<AppState>,
    reservation_id: Result<Path<ReservationId>, PathRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let Path(reservation_id) = reservation_id.map_err(rejected_path)?;

    closed(state.booking.cancel_reservation(reservation_id).await)
}

/// Mark a confirmed reservation as completed and free its table.
///
/// # Errors
///
/// - `400 Bad Request`: Id is not an integer, or the reservation is already
///   completed or cancelled
/// - `401 Unauthorized`: Missing or wrong API key
/// - `404 Not Found`: Reservation doesn't exist
pub async fn complete_reservation(
    State(state): State<AppState>,
    reservation_id: Result<Path<ReservationId>, PathRejection>,
) -> Result<Json<Reservation>, ApiError> {
    let Path(reservation_id) = reservation_id.map_err(rejected_path)?;

    closed(state.booking.complete_reservation(reservation_id).await)
}

fn closed(result: BookingResult<Reservation>) -> Result<Json<Reservation>, ApiError> {
    let reservation = result.map_err(error_response)?;
    let outcome = reservation.status.to_string().to_lowercase();
    metrics::reservations_closed_total(&outcome);
    logging::log_booking_event(&outcome, reservation.id, reservation.table_id);
    Ok(Json(reservation))
}
