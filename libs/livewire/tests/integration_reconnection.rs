//! Integration tests for reconnection policies
//!
//! These tests verify backoff behavior with different policies, including
//! the platform default schedule.

use livewire::traits::reconnect::{
    ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectPolicy,
};
use std::time::Duration;

/// Macro for verbose test output
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

#[test]
fn test_default_backoff_schedule() {
    verbose_println!("Testing the default backoff schedule...");

    // 1s base, 30s ceiling, five attempts
    let policy = ExponentialBackoff::default();

    let expected_secs = [1, 2, 4, 8, 16];

    for (attempt, &expected) in expected_secs.iter().enumerate() {
        let delay = policy.next_delay(attempt).unwrap();
        verbose_println!("  Attempt {}: {:?}", attempt, delay);
        assert_eq!(
            delay,
            Duration::from_secs(expected),
            "Unexpected delay at attempt {}",
            attempt
        );
    }

    // Attempt 5 must not be scheduled (cap = 5)
    assert!(
        policy.next_delay(5).is_none(),
        "No sixth attempt may be scheduled"
    );
    assert!(!policy.should_retry(5));
}

#[test]
fn test_exponential_backoff_full_sequence() {
    verbose_println!("Testing exponential backoff full sequence...");

    let policy = ExponentialBackoff::new(
        Duration::from_millis(100),
        Duration::from_secs(10),
        Some(5),
    );

    let expected_delays = [100, 200, 400, 800, 1600];

    for (attempt, &expected_ms) in expected_delays.iter().enumerate() {
        let delay = policy.next_delay(attempt).unwrap();
        verbose_println!("  Attempt {}: {:?}", attempt, delay);
        assert_eq!(
            delay.as_millis(),
            expected_ms,
            "Unexpected delay at attempt {}",
            attempt
        );
    }

    assert!(
        policy.next_delay(5).is_none(),
        "Should return None after max attempts"
    );
}

#[test]
fn test_exponential_backoff_with_capping() {
    verbose_println!("Testing exponential backoff with capping...");

    let policy = ExponentialBackoff::new(
        Duration::from_secs(1),
        Duration::from_secs(30), // Ceiling
        None,
    );

    // 1, 2, 4, 8, 16, then the formula would give 32 - capped to 30
    let delays: Vec<u64> = (0..8)
        .map(|i| policy.next_delay(i).unwrap().as_secs())
        .collect();

    verbose_println!("  Delays: {:?}", delays);

    assert_eq!(delays[0], 1);
    assert_eq!(delays[1], 2);
    assert_eq!(delays[2], 4);
    assert_eq!(delays[3], 8);
    assert_eq!(delays[4], 16);
    assert_eq!(delays[5], 30); // Capped
    assert_eq!(delays[6], 30); // Capped
    assert_eq!(delays[7], 30); // Capped
}

#[test]
fn test_fixed_delay_consistency() {
    verbose_println!("Testing fixed delay consistency...");

    let policy = FixedDelay::new(Duration::from_millis(750), None);

    for attempt in 0..100 {
        let delay = policy.next_delay(attempt).unwrap();
        assert_eq!(
            delay,
            Duration::from_millis(750),
            "Fixed delay should be constant"
        );
    }

    verbose_println!("  All 100 attempts returned 750ms");
}

#[test]
fn test_fixed_delay_with_max_attempts() {
    verbose_println!("Testing fixed delay with max attempts...");

    let policy = FixedDelay::new(Duration::from_millis(500), Some(3));

    assert!(policy.next_delay(0).is_some());
    assert!(policy.next_delay(1).is_some());
    assert!(policy.next_delay(2).is_some());
    assert!(policy.next_delay(3).is_none()); // 4th attempt (0-indexed)

    verbose_println!("  Max attempts limit working correctly");
}

#[test]
fn test_never_reconnect_always_fails() {
    verbose_println!("Testing NeverReconnect policy...");

    let policy = NeverReconnect;

    for attempt in 0..10 {
        assert!(
            policy.next_delay(attempt).is_none(),
            "NeverReconnect should always return None"
        );
        assert!(
            !policy.should_retry(attempt),
            "NeverReconnect should never allow reconnection"
        );
    }

    verbose_println!("  NeverReconnect correctly prevents all reconnections");
}

#[test]
fn test_exponential_backoff_overflow_safety() {
    verbose_println!("Testing exponential backoff overflow safety...");

    let policy = ExponentialBackoff::new(
        Duration::from_millis(100),
        Duration::from_secs(3600), // 1 hour max
        None,
    );

    // 100ms * 2^30 would overflow naive arithmetic, but is capped
    let delay = policy.next_delay(30).unwrap();
    verbose_println!("  Delay at attempt 30: {:?}", delay);

    assert!(delay <= Duration::from_secs(3600));

    // Even at extreme values, should not panic
    let _ = policy.next_delay(100);
    let _ = policy.next_delay(1000);

    verbose_println!("  Overflow safety verified");
}
