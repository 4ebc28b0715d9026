use std::time::Duration;

/// Trait for defining reconnection policies
///
/// Implement this trait to control how a session behaves after an
/// unexpected disconnection.
pub trait ReconnectPolicy: Send + Sync {
    /// Get the delay before the next reconnection attempt
    ///
    /// # Arguments
    /// * `attempt` - The reconnection attempt number (0-indexed)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long before reconnecting
    /// * `None` - Stop reconnecting
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check whether another attempt should be made
    ///
    /// # Arguments
    /// * `attempt` - The current reconnection attempt number
    fn should_retry(&self, attempt: usize) -> bool;
}

/// Exponential backoff reconnection policy
///
/// Delays between attempts grow exponentially:
/// `base_delay * 2^attempt`, capped at `max_delay`, bounded by an optional
/// attempt cap after which the session stays disconnected until an explicit
/// reopen.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: Option<usize>,
}

impl ExponentialBackoff {
    /// Create a new exponential backoff policy
    ///
    /// # Arguments
    /// * `base_delay` - The delay before the first retry
    /// * `max_delay` - The ceiling for any single delay
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(base_delay: Duration, max_delay: Duration, max_attempts: Option<usize>) -> Self {
        Self {
            base_delay,
            max_delay,
            max_attempts,
        }
    }
}

impl Default for ExponentialBackoff {
    /// The platform default: 1s base, 30s ceiling, five attempts.
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30), Some(5))
    }
}

impl ReconnectPolicy for ExponentialBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }

        let exp = 2u64.checked_pow(attempt.min(u32::MAX as usize) as u32);
        let delay_ms = exp
            .and_then(|e| (self.base_delay.as_millis() as u64).checked_mul(e))
            .unwrap_or(u64::MAX);
        Some(Duration::from_millis(
            delay_ms.min(self.max_delay.as_millis() as u64),
        ))
    }

    fn should_retry(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Fixed delay reconnection policy
///
/// Always waits the same amount of time between attempts
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
    max_attempts: Option<usize>,
}

impl FixedDelay {
    /// Create a new fixed delay policy
    ///
    /// # Arguments
    /// * `delay` - The fixed delay between attempts
    /// * `max_attempts` - Maximum number of attempts (None = unlimited)
    pub fn new(delay: Duration, max_attempts: Option<usize>) -> Self {
        Self { delay, max_attempts }
    }
}

impl ReconnectPolicy for FixedDelay {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }
        Some(self.delay)
    }

    fn should_retry(&self, attempt: usize) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Never reconnect policy
///
/// The session will not attempt to reconnect after a disconnection
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectPolicy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn should_retry(&self, _attempt: usize) -> bool {
        false
    }
}
