//! Structured logging configuration.
//!
//! The library crate logs through the `log` facade; those records are bridged
//! into the same `tracing` subscriber as the server's own events.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info,sqlx=warn,hyper=warn`.
///
/// # Example
///
/// ```no_run
/// use tb_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Example
///
/// ```
/// use tb_server::logging::log_security_event;
///
/// log_security_event("invalid_api_key", Some("/reservations"), "API key mismatch");
/// ```
pub fn log_security_event(event_type: &str, path: Option<&str>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        http_path = path,
        "SECURITY: {}",
        message
    );
}

/// Log a reservation lifecycle event
pub fn log_booking_event(event: &str, reservation_id: i64, table_id: i64) {
    tracing::info!(
        event = event,
        reservation_id = reservation_id,
        table_id = table_id,
        "Booking event"
    );
}
