//! HTTP API for the reservation server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS, request ids and the API key check
//! - **BookingManager**: All booking rules live in the `table_booking` crate
//!
//! # Modules
//!
//! - [`tables`]: List tables, search availability, override table state
//! - [`reservations`]: Create, get, cancel and complete reservations
//! - [`middleware`]: API key check for protected endpoints
//! - [`request_id`]: Request correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Health check (public)
//! GET  /tables                          - List tables (public)
//! POST /availability                    - Free tables for a time (API key)
//! POST /reservations                    - Book a table (API key)
//! GET  /reservations/{id}               - Get reservation (public)
//! PUT  /reservations/{id}/cancel        - Cancel reservation (API key)
//! PUT  /reservations/{id}/complete      - Complete reservation (API key)
//! PUT  /tables/{id}/state               - Set Free/Occupied (API key)
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tb_server::api::{create_router, AppState};
//! use std::sync::Arc;
//! use table_booking::{auth::ApiKey, booking::BookingManager};
//! use table_booking::db::MemoryBookingRepository;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     booking: Arc::new(BookingManager::with_repository(Arc::new(
//!         MemoryBookingRepository::new(),
//!     ))),
//!     api_key: ApiKey::new("change-me-please"),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is permissive so browser front-ends and automation tools can call the
//! API directly.

pub mod middleware;
pub mod request_id;
pub mod reservations;
pub mod tables;

use axum::{
    Router,
    extract::{
        State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use table_booking::{
    auth::ApiKey,
    booking::{BookingError, BookingManager, ErrorKind},
};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingManager>,
    pub api_key: ApiKey,
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a booking error onto a status code and client-safe message.
///
/// Validation and conflict errors are both `400 Bad Request`; the message says
/// which.
pub fn error_response(err: BookingError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => {
            tracing::error!("Booking operation failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Malformed or mistyped JSON bodies are validation errors.
pub fn rejected_body(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

/// Ids in the URL that do not parse as integers are validation errors.
pub fn rejected_path(rejection: PathRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/tables", get(tables::list_tables))
        .route(
            "/reservations/{reservation_id}",
            get(reservations::get_reservation),
        );

    let protected_routes = Router::new()
        .route("/availability", post(tables::check_availability))
        .route("/reservations", post(reservations::create_reservation))
        .route(
            "/reservations/{reservation_id}/cancel",
            put(reservations::cancel_reservation),
        )
        .route(
            "/reservations/{reservation_id}/complete",
            put(reservations::complete_reservation),
        )
        .route("/tables/{table_id}/state", put(tables::update_table_state))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"0.1.0","database":true,"timestamp":"2025-07-01T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = state.booking.health_check().await.is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
