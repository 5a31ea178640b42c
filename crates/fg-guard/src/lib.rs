//! # fg-guard
//!
//! Request gating for formgate: the fixed-window submission limiter,
//! client-identifier derivation, CSRF token helpers, and the YAML
//! security configuration that ties the pieces together.
//!
//! The submission handler is expected to check the rate limit once per
//! attempt (keyed by a hashed client identifier) before running the
//! contact-form validator from `fg-core`; neither side calls the
//! other.

pub mod client;
pub mod config;
pub mod csrf;
pub mod rate_limit;

pub use client::{client_key, client_key_for_ip, extract_client_ip};
pub use config::{load_security_config, ConfigError, RateLimitSettings, SecurityConfig};
pub use csrf::{extract_csrf_from_form_or_header, generate_csrf_token, validate_csrf_token};
pub use rate_limit::{
    register_rate_limit_metrics, FixedWindowLimiter, RateLimitDecision,
    DEFAULT_MAX_TRACKED_CLIENTS,
};
