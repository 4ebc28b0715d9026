//! Liveness tracking
//!
//! Detects half-open connections: TCP teardown that the peer never signaled,
//! where the socket stays nominally open but nothing answers. A probe is
//! recorded when the heartbeat sends it; the connection is unhealthy if no
//! response arrives within the configured timeout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Tracks liveness probe/response times to detect dead connections
///
/// Uses atomic operations for lock-free access from the heartbeat task and
/// the session loop. Timestamps are stored as milliseconds since an internal
/// epoch so they fit in an atomic u64.
pub struct LivenessTracker {
    /// Epoch time when tracking started (for converting Instant to u64)
    epoch: Instant,
    /// Last probe sent (ms since epoch)
    last_probe_sent_ms: AtomicU64,
    /// Last response received (ms since epoch)
    last_response_received_ms: AtomicU64,
    /// If no response within this duration after a probe, the connection is
    /// unhealthy
    timeout: Duration,
}

impl LivenessTracker {
    /// Create a new tracker with the specified timeout
    ///
    /// # Arguments
    /// * `timeout` - How long to wait for a response after a probe
    ///   (recommended: 3x the heartbeat interval)
    pub fn new(timeout: Duration) -> Self {
        Self {
            epoch: Instant::now(),
            last_probe_sent_ms: AtomicU64::new(0),
            last_response_received_ms: AtomicU64::new(0),
            timeout,
        }
    }

    /// Record that a probe was just sent
    pub fn record_probe_sent(&self) {
        let ms = self.epoch.elapsed().as_millis() as u64;
        self.last_probe_sent_ms.store(ms, Ordering::Release);
    }

    /// Record that a response was just received
    pub fn record_response_received(&self) {
        let ms = self.epoch.elapsed().as_millis() as u64;
        self.last_response_received_ms.store(ms, Ordering::Release);
    }

    /// Check if the connection appears healthy
    ///
    /// Returns true if:
    /// - No probe has been sent yet (nothing to check)
    /// - A response arrived after the last probe
    /// - The timeout has not elapsed since the last probe
    pub fn is_healthy(&self) -> bool {
        let probe_ms = self.last_probe_sent_ms.load(Ordering::Acquire);
        let response_ms = self.last_response_received_ms.load(Ordering::Acquire);

        // No probes sent yet = healthy (nothing to check)
        if probe_ms == 0 {
            return true;
        }

        // Response received after last probe = healthy
        if response_ms >= probe_ms {
            return true;
        }

        let now_ms = self.epoch.elapsed().as_millis() as u64;
        let since_probe_ms = now_ms.saturating_sub(probe_ms);
        since_probe_ms < self.timeout.as_millis() as u64
    }

    /// Time since the last response was received
    ///
    /// Returns None if no response has ever been received.
    pub fn time_since_last_response(&self) -> Option<Duration> {
        let response_ms = self.last_response_received_ms.load(Ordering::Acquire);
        if response_ms == 0 {
            return None;
        }
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        Some(Duration::from_millis(now_ms.saturating_sub(response_ms)))
    }

    /// Reset the tracker state
    ///
    /// Call this when reconnecting to start fresh.
    pub fn reset(&self) {
        self.last_probe_sent_ms.store(0, Ordering::Release);
        self.last_response_received_ms.store(0, Ordering::Release);
    }
}
