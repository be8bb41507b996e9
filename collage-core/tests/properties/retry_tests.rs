//! Property tests for autosave retry backoff

use std::io;
use std::time::Duration;

use collage_core::autosave::{RetryConfig, retry_with_backoff};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = RetryConfig> {
    (0u32..8, 1u64..2_000, 1u64..10_000, 1.0f64..4.0).prop_map(|(attempts, initial, max, multiplier)| {
        RetryConfig::new()
            .with_max_attempts(attempts)
            .with_initial_delay_ms(initial)
            .with_max_delay_ms(max)
            .with_backoff_multiplier(multiplier)
    })
}

proptest! {
    /// Property: delays never exceed the cap and never shrink
    #[test]
    fn delays_are_capped_and_monotonic(config in config_strategy()) {
        let cap = Duration::from_millis(config.max_delay_ms);
        let mut previous = Duration::ZERO;
        for attempt in 0..config.max_attempts {
            let delay = config.delay_for_attempt(attempt).unwrap();
            prop_assert!(delay <= cap);
            prop_assert!(delay >= previous);
            previous = delay;
        }
        prop_assert_eq!(config.delay_for_attempt(config.max_attempts), None);
    }

    /// Property: an always-transient failure is tried exactly `total_attempts` times
    #[test]
    fn transient_failures_use_every_attempt(config in config_strategy()) {
        let mut calls = 0u32;
        let mut sleeps = Vec::new();
        let result: Result<(), (io::Error, u32)> = retry_with_backoff(
            &config,
            |_| true,
            |delay| sleeps.push(delay),
            || {
                calls += 1;
                Err(io::Error::new(io::ErrorKind::Interrupted, "busy"))
            },
        );
        let (_, attempts) = result.unwrap_err();
        prop_assert_eq!(attempts, config.total_attempts());
        prop_assert_eq!(calls, config.total_attempts());
        prop_assert_eq!(sleeps.len() as u32, config.max_attempts);
    }
}

#[test]
fn permanent_failure_stops_after_one_attempt() {
    let mut calls = 0;
    let result: Result<(), (io::Error, u32)> = retry_with_backoff(
        &RetryConfig::default(),
        |e: &io::Error| e.kind() != io::ErrorKind::PermissionDenied,
        |_| panic!("must not sleep"),
        || {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        },
    );
    assert_eq!(result.unwrap_err().1, 1);
    assert_eq!(calls, 1);
}

#[test]
fn disabled_retry_runs_once() {
    let config = RetryConfig::no_retry();
    assert_eq!(config.total_attempts(), 1);
    assert_eq!(config.delay_for_attempt(0), None);
}
