//! Rate limiting integration tests.
//!
//! These tests verify the submission-throttling safety controls from
//! the public API:
//! - the fixed-window budget is enforced per client key
//! - rejected attempts never consume additional budget
//! - windows reset after they elapse
//! - limiter memory is bounded via LRU eviction
//! - concurrent access is thread-safe
//! - the limiter composes with the shipped configuration and the
//!   hashed client keys the handler is expected to use

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fg_guard::{client_key, FixedWindowLimiter, SecurityConfig};

const WINDOW: Duration = Duration::from_secs(60);

// =============================================================================
// Budget enforcement
// =============================================================================

#[test]
fn budget_counts_down_then_rejects() {
    let limiter = FixedWindowLimiter::new();

    let expected = [2u32, 1, 0];
    for remaining in expected {
        let decision = limiter.check_and_consume("client", 3, WINDOW);
        assert!(decision.allowed, "attempt should be within budget");
        assert_eq!(decision.remaining, remaining);
    }

    let decision = limiter.check_and_consume("client", 3, WINDOW);
    assert!(!decision.allowed, "fourth attempt should be rejected");
    assert_eq!(decision.remaining, 0);
}

#[test]
fn exhausted_key_stays_at_zero_remaining() {
    let limiter = FixedWindowLimiter::new();
    for _ in 0..3 {
        limiter.check_and_consume("client", 3, WINDOW);
    }

    let rejected = limiter.check_and_consume("client", 3, WINDOW);
    assert!(!rejected.allowed);

    // Hammering the endpoint must not deepen the penalty, move the
    // reset time, or underflow the remaining count.
    for _ in 0..10 {
        let decision = limiter.check_and_consume("client", 3, WINDOW);
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.reset_at, rejected.reset_at);
    }
}

#[test]
fn clients_have_independent_budgets() {
    let limiter = FixedWindowLimiter::new();

    for _ in 0..2 {
        assert!(limiter.check_and_consume("a", 2, WINDOW).allowed);
    }
    assert!(!limiter.check_and_consume("a", 2, WINDOW).allowed);

    // A different client is unaffected.
    assert!(limiter.check_and_consume("b", 2, WINDOW).allowed);
}

// =============================================================================
// Window reset
// =============================================================================

#[test]
fn elapsed_window_restores_the_full_budget() {
    let limiter = FixedWindowLimiter::new();
    let window = Duration::from_millis(50);

    for _ in 0..2 {
        assert!(limiter.check_and_consume("client", 2, window).allowed);
    }
    assert!(!limiter.check_and_consume("client", 2, window).allowed);

    thread::sleep(Duration::from_millis(80));

    let decision = limiter.check_and_consume("client", 2, window);
    assert!(decision.allowed, "budget should reset after the window");
    assert_eq!(decision.remaining, 1);
}

// =============================================================================
// Memory bounds
// =============================================================================

#[test]
fn unique_key_flood_is_bounded_by_lru() {
    let limiter = FixedWindowLimiter::with_max_entries(100);

    for i in 0..1_000 {
        limiter.check_and_consume(&format!("attacker-{i}"), 5, WINDOW);
    }

    assert_eq!(limiter.tracked_keys(), 100);
    assert_eq!(limiter.eviction_count(), 900);
}

#[test]
fn active_key_survives_eviction_pressure() {
    let limiter = FixedWindowLimiter::with_max_entries(3);

    limiter.check_and_consume("regular", 10, WINDOW);
    for i in 0..10 {
        // Touching the regular key promotes it in LRU order.
        limiter.check_and_consume("regular", 10, WINDOW);
        limiter.check_and_consume(&format!("drive-by-{i}"), 10, WINDOW);
    }

    // The regular client's window survived; its count kept growing.
    let decision = limiter.check_and_consume("regular", 12, WINDOW);
    assert!(decision.allowed);
    assert_eq!(decision.remaining, 0);
}

// =============================================================================
// Thread safety
// =============================================================================

#[test]
fn concurrent_attempts_never_exceed_the_budget() {
    let limiter = Arc::new(FixedWindowLimiter::new());
    let limit = 40u32;
    let threads = 8;
    let attempts_per_thread = 20;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            thread::spawn(move || {
                let mut allowed = 0u32;
                for _ in 0..attempts_per_thread {
                    if limiter.check_and_consume("shared", limit, WINDOW).allowed {
                        allowed += 1;
                    }
                }
                allowed
            })
        })
        .collect();

    let total_allowed: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(
        total_allowed, limit,
        "exactly `limit` of the {} attempts should pass",
        threads * attempts_per_thread
    );
}

// =============================================================================
// Composition with configuration and client keys
// =============================================================================

#[test]
fn shipped_policy_allows_five_submissions_per_hour() {
    let config = SecurityConfig::default();
    let settings = config.contact_form_rate_limit;
    let limiter = FixedWindowLimiter::new();
    let key = client_key("203.0.113.7");

    for _ in 0..settings.max_submissions {
        let decision = limiter.check_and_consume(&key, settings.max_submissions, settings.window());
        assert!(decision.allowed);
    }

    let decision = limiter.check_and_consume(&key, settings.max_submissions, settings.window());
    assert!(!decision.allowed, "sixth submission within the hour is rejected");
}

#[test]
fn hashed_keys_keep_clients_separate() {
    let limiter = FixedWindowLimiter::new();
    let key_a = client_key("203.0.113.7");
    let key_b = client_key("203.0.113.8");
    assert_ne!(key_a, key_b);

    assert!(limiter.check_and_consume(&key_a, 1, WINDOW).allowed);
    assert!(!limiter.check_and_consume(&key_a, 1, WINDOW).allowed);
    assert!(limiter.check_and_consume(&key_b, 1, WINDOW).allowed);
}
