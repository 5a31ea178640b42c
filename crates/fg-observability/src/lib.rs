//! # fg-observability
//!
//! Logging and metrics bootstrap for formgate.
//!
//! The library crates emit `tracing` events and `metrics` counters at
//! their decision points; this crate owns process-level setup: the
//! subscriber configuration and the metric descriptions.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
pub use metrics::register_metrics;
