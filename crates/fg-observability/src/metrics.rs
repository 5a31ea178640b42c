//! Metric descriptions for formgate.
//!
//! The library crates record these series at their decision points;
//! registering the descriptions once at startup gives the exporter
//! stable help texts.

use metrics::{describe_counter, describe_gauge};

/// Registers all formgate metric descriptions.
/// Call once during process initialization.
pub fn register_metrics() {
    describe_counter!(
        "formgate_submissions_validated_total",
        "Contact submissions validated, labeled by outcome"
    );
    describe_counter!(
        "formgate_fields_failed_total",
        "Contact-form fields that failed validation"
    );
    describe_counter!(
        "formgate_threats_flagged_total",
        "Inputs flagged by an injection heuristic, labeled by kind"
    );
    describe_counter!(
        "formgate_rate_limited_total",
        "Submissions rejected by the rate limiter"
    );
    describe_counter!(
        "formgate_rate_limiter_evictions_total",
        "LRU evictions from the rate limiter store"
    );
    describe_gauge!(
        "formgate_rate_limiter_tracked_clients",
        "Client identifiers currently tracked by the rate limiter"
    );
}
