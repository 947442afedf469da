//! HTTP front-end for the `table_booking` reservation engine.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
