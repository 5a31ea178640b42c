//! Fixed-window rate limiting for contact submissions.
//!
//! Each client identifier gets a counter that resets at fixed window
//! boundaries. This is deliberately the coarse fixed-window scheme,
//! not a sliding window or token bucket: a client can fit up to twice
//! the limit into a burst that straddles a window boundary. For a
//! low-traffic contact form that is an accepted trade for the simpler
//! semantics, and callers depend on the exact remaining/reset values
//! the scheme produces.
//!
//! Rejected attempts do not consume budget: hammering an exhausted key
//! reports `remaining = 0` indefinitely without extending or deepening
//! the penalty.
//!
//! Security: client state lives in an LRU cache with a bounded entry
//! count, so a flood of unique identifiers cannot grow the store
//! without limit. Eviction of an idle key forgets its window early;
//! with the default capacity that only matters under synthetic load.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use serde::Serialize;

/// Default maximum number of client identifiers tracked at once.
pub const DEFAULT_MAX_TRACKED_CLIENTS: usize = 10_000;

/// Registers rate limiter metric descriptions.
/// Call once during process initialization.
pub fn register_rate_limit_metrics() {
    describe_counter!(
        "formgate_rate_limited_total",
        "Total number of submissions rejected by the rate limiter"
    );
    describe_counter!(
        "formgate_rate_limiter_evictions_total",
        "Total number of LRU evictions from the rate limiter store"
    );
    describe_gauge!(
        "formgate_rate_limiter_tracked_clients",
        "Current number of client identifiers tracked by the rate limiter"
    );
}

/// One client's counter for the current window.
#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether this attempt may proceed.
    pub allowed: bool,
    /// Attempts left in the current window (0 when rejected).
    pub remaining: u32,
    /// When the current window ends and the counter resets.
    pub reset_at: DateTime<Utc>,
}

/// Fixed-window submission limiter keyed by opaque client identifier.
///
/// The store is `Mutex`-guarded so the read-decide-write sequence is
/// atomic per call; the type is `Send + Sync` and can be shared behind
/// an `Arc` by a multi-threaded host.
pub struct FixedWindowLimiter {
    records: Mutex<LruCache<String, WindowRecord>>,
    evictions: AtomicU64,
}

impl FixedWindowLimiter {
    /// Creates a limiter with the default tracked-client capacity.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_TRACKED_CLIENTS)
    }

    /// Creates a limiter that tracks at most `max_entries` clients.
    /// A zero capacity is clamped to one.
    pub fn with_max_entries(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).expect("capacity is clamped to >= 1");
        Self {
            records: Mutex::new(LruCache::new(capacity)),
            evictions: AtomicU64::new(0),
        }
    }

    /// Checks whether `key` may submit, consuming one unit of budget
    /// if so.
    ///
    /// `limit` is the number of allowed attempts per window and
    /// `window` the window length; both are clamped to sane minimums
    /// (1 attempt, 1 ms) since a zero here is a caller bug, not a
    /// reason to fail the request. Always returns a decision.
    pub fn check_and_consume(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
    ) -> RateLimitDecision {
        let limit = limit.max(1);
        let window = if window.is_zero() {
            Duration::from_millis(1)
        } else {
            window
        };
        let now = Utc::now();

        let mut records = self.records.lock().unwrap();

        if let Some(record) = records.get_mut(key) {
            if now <= record.reset_at {
                if record.count >= limit {
                    let reset_at = record.reset_at;
                    counter!("formgate_rate_limited_total").increment(1);
                    tracing::warn!(
                        key = %key,
                        limit,
                        window_secs = window.as_secs(),
                        "submission rate limit exceeded"
                    );
                    return RateLimitDecision {
                        allowed: false,
                        remaining: 0,
                        reset_at,
                    };
                }
                record.count += 1;
                return RateLimitDecision {
                    allowed: true,
                    remaining: limit - record.count,
                    reset_at: record.reset_at,
                };
            }
        }

        // First attempt from this key, or its previous window expired.
        let reset_at = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| now.checked_add_signed(w))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let evicted = records.push(
            key.to_string(),
            WindowRecord {
                count: 1,
                reset_at,
            },
        );
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                counter!("formgate_rate_limiter_evictions_total").increment(1);
                tracing::debug!(
                    evicted = %evicted_key,
                    tracked = records.len(),
                    "rate limiter evicted least recently used client"
                );
            }
        }
        gauge!("formgate_rate_limiter_tracked_clients").set(records.len() as f64);

        RateLimitDecision {
            allowed: true,
            remaining: limit - 1,
            reset_at,
        }
    }

    /// Clears the window state for one key (manual unblocking).
    pub fn clear_key(&self, key: &str) {
        let mut records = self.records.lock().unwrap();
        records.pop(key);
        gauge!("formgate_rate_limiter_tracked_clients").set(records.len() as f64);
    }

    /// Returns the number of client identifiers currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns the total number of LRU evictions so far.
    pub fn eviction_count(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn counts_down_remaining_within_a_window() {
        let limiter = FixedWindowLimiter::new();

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check_and_consume("k", 3, WINDOW);
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = limiter.check_and_consume("k", 3, WINDOW);
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn rejected_attempts_do_not_consume_budget() {
        let limiter = FixedWindowLimiter::new();
        for _ in 0..2 {
            limiter.check_and_consume("k", 2, WINDOW);
        }

        let first_rejection = limiter.check_and_consume("k", 2, WINDOW);
        assert!(!first_rejection.allowed);

        for _ in 0..10 {
            let decision = limiter.check_and_consume("k", 2, WINDOW);
            assert!(!decision.allowed);
            assert_eq!(decision.remaining, 0);
            assert_eq!(decision.reset_at, first_rejection.reset_at);
        }
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = FixedWindowLimiter::new();
        let window = Duration::from_millis(40);

        assert!(limiter.check_and_consume("k", 1, window).allowed);
        assert!(!limiter.check_and_consume("k", 1, window).allowed);

        std::thread::sleep(Duration::from_millis(60));

        let decision = limiter.check_and_consume("k", 1, window);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = FixedWindowLimiter::new();

        assert!(limiter.check_and_consume("a", 1, WINDOW).allowed);
        assert!(!limiter.check_and_consume("a", 1, WINDOW).allowed);

        assert!(limiter.check_and_consume("b", 1, WINDOW).allowed);
    }

    #[test]
    fn zero_limit_and_window_are_clamped() {
        let limiter = FixedWindowLimiter::new();

        // Limit 0 behaves as 1.
        let decision = limiter.check_and_consume("k", 0, WINDOW);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);

        // A zero window still produces a decision with a reset time.
        let decision = limiter.check_and_consume("z", 5, Duration::ZERO);
        assert!(decision.allowed);
    }

    #[test]
    fn store_is_bounded_by_lru_eviction() {
        let limiter = FixedWindowLimiter::with_max_entries(3);

        for key in ["a", "b", "c"] {
            limiter.check_and_consume(key, 5, WINDOW);
        }
        assert_eq!(limiter.tracked_keys(), 3);
        assert_eq!(limiter.eviction_count(), 0);

        limiter.check_and_consume("d", 5, WINDOW);
        assert_eq!(limiter.tracked_keys(), 3);
        assert_eq!(limiter.eviction_count(), 1);
    }

    #[test]
    fn clear_key_forgets_the_window() {
        let limiter = FixedWindowLimiter::new();

        limiter.check_and_consume("k", 1, WINDOW);
        assert!(!limiter.check_and_consume("k", 1, WINDOW).allowed);

        limiter.clear_key("k");
        assert!(limiter.check_and_consume("k", 1, WINDOW).allowed);
    }

    #[test]
    fn reset_at_is_in_the_future() {
        let limiter = FixedWindowLimiter::new();
        let before = Utc::now();
        let decision = limiter.check_and_consume("k", 5, WINDOW);
        assert!(decision.reset_at > before);
    }
}
