//! Retry with exponential backoff for autosave writes
//!
//! A snapshot write that fails for a transient reason (disk briefly busy,
//! interrupted syscall) is retried a bounded number of times. The delay
//! before retry `n` (0-based) is `min(initial_delay * multiplier^n, max_delay)`.

use std::fmt::Display;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum number of retries after the first attempt
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry in milliseconds
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;

/// Default upper bound for a single delay in milliseconds
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

/// Default backoff multiplier (delay doubles each retry)
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Retry behaviour of the autosave write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries (0 = single attempt)
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound for a single delay in milliseconds
    pub max_delay_ms: u64,
    /// Multiplier applied per retry
    pub backoff_multiplier: f64,
    /// Whether retries happen at all
    pub enabled: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            enabled: true,
        }
    }
}

impl RetryConfig {
    /// Creates a retry configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retries
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            enabled: false,
            ..Self::default()
        }
    }

    /// Sets the maximum number of retries
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay before the first retry
    #[must_use]
    pub const fn with_initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    /// Sets the upper bound for a single delay
    #[must_use]
    pub const fn with_max_delay_ms(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    /// Sets the backoff multiplier
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay before retry `attempt` (0-indexed), or `None` once retries are
    /// disabled or exhausted.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay_ms = self.initial_delay_ms as f64 * self.backoff_multiplier.max(1.0).powi(exponent);
        let capped = if delay_ms.is_finite() {
            (delay_ms as u64).min(self.max_delay_ms)
        } else {
            self.max_delay_ms
        };
        Some(Duration::from_millis(capped))
    }

    /// Returns whether retry `attempt` (0-indexed) may happen
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        self.enabled && attempt < self.max_attempts
    }

    /// Total number of attempts including the first one
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts + 1
        } else {
            1
        }
    }
}

/// Progress of one retried operation.
#[derive(Debug, Clone)]
pub struct RetryState {
    current_attempt: u32,
    config: RetryConfig,
    last_error: Option<String>,
}

impl RetryState {
    /// Starts tracking an operation under `config`
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self {
            current_attempt: 0,
            config,
            last_error: None,
        }
    }

    /// Number of failures recorded so far
    #[must_use]
    pub const fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    /// 1-indexed attempt number for log messages
    #[must_use]
    pub const fn attempt_number(&self) -> u32 {
        self.current_attempt + 1
    }

    /// Returns whether another retry may happen
    #[must_use]
    pub const fn should_retry(&self) -> bool {
        self.config.should_retry(self.current_attempt)
    }

    /// Delay before the next retry
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.config.delay_for_attempt(self.current_attempt)
    }

    /// Records a failure and returns true if another retry will follow.
    ///
    /// The delay for that retry must be read with [`next_delay`](Self::next_delay)
    /// before recording.
    pub fn record_failure(&mut self, error: impl Into<String>) -> bool {
        self.last_error = Some(error.into());
        let retry = self.should_retry();
        self.current_attempt += 1;
        retry
    }

    /// Message of the most recent failure
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }
}

/// Runs `op` until it succeeds, fails permanently or runs out of retries.
///
/// `is_transient` decides which errors are worth retrying. `sleep` is
/// called with each backoff delay; production code passes
/// `std::thread::sleep`, tests pass a recorder. On failure the last error is
/// returned together with the number of attempts made.
///
/// # Errors
///
/// Returns the last error and the attempt count when no attempt succeeded.
pub fn retry_with_backoff<T, E: Display>(
    config: &RetryConfig,
    is_transient: impl Fn(&E) -> bool,
    mut sleep: impl FnMut(Duration),
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, (E, u32)> {
    let mut state = RetryState::new(config.clone());
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let delay = state.next_delay();
                let transient = is_transient(&e);
                if !transient || !state.record_failure(e.to_string()) {
                    let attempts = if transient {
                        state.current_attempt()
                    } else {
                        state.attempt_number()
                    };
                    return Err((e, attempts));
                }
                tracing::debug!(
                    attempt = state.current_attempt(),
                    error = %e,
                    delay_ms = delay.map_or(0, |d| d.as_millis()),
                    "Retrying after transient failure"
                );
                if let Some(delay) = delay {
                    sleep(delay);
                }
            }
        }
    }
}
