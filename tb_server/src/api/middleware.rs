//! API key middleware for protected endpoints.
//!
//! Mutating endpoints (and availability search) require the shared secret in
//! the `x-api-key` header. Read-only lookups are public.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::post, middleware};
//! # use tb_server::api::middleware::api_key_middleware;
//! # use tb_server::api::AppState;
//! # async fn handler() {}
//! # let state: AppState = unimplemented!();
//!
//! let protected_routes: Router<AppState> = Router::new()
//!     .route("/reservations", post(handler))
//!     .layer(middleware::from_fn_with_state(state.clone(), api_key_middleware));
//! # let _ = protected_routes;
//! ```

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use table_booking::auth::API_KEY_HEADER;

use super::{ApiError, AppState, ErrorResponse};
use crate::{logging, metrics};

/// Reject requests whose `x-api-key` header does not match the configured key.
///
/// # Behavior
///
/// - **Match**: calls the next handler
/// - **Missing header**: `401 Unauthorized`
/// - **Wrong key**: `401 Unauthorized`
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let rejection = match request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(key) if state.api_key.verify(key) => None,
        Some(_) => Some("invalid_api_key"),
        None => Some("missing_api_key"),
    };

    let Some(event) = rejection else {
        return Ok(next.run(request).await);
    };

    logging::log_security_event(event, Some(request.uri().path()), "Rejected API key");
    metrics::api_key_rejections_total();

    Err((
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Invalid or missing API key".to_string(),
        }),
    ))
}
