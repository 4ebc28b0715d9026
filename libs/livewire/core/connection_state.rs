//! Atomic connection state and session metrics
//!
//! State transitions happen from timer callbacks, the session task, and
//! consumer threads, so the state lives in a single atomic u8 rather than
//! behind a lock.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Connection lifecycle states for a channel session
///
/// `Reconnecting` is a flavor of connecting: the session is between a lost
/// connection and the next dial attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection, and no attempt in progress
    Disconnected,
    /// First connection attempt in progress
    Connecting,
    /// Connection is established and live
    Connected,
    /// Lost the connection, a scheduled attempt is pending or dialing
    Reconnecting,
    /// Intentional teardown in progress; no reconnection will follow
    ShuttingDown,
}

impl ConnectionState {
    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Reconnecting => 3,
            ConnectionState::ShuttingDown => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            4 => ConnectionState::ShuttingDown,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Lock-free holder for the current [`ConnectionState`]
pub struct AtomicConnectionState {
    state: AtomicU8,
}

impl AtomicConnectionState {
    /// Create a new holder with the given initial state
    pub fn new(initial: ConnectionState) -> Self {
        Self {
            state: AtomicU8::new(initial.as_u8()),
        }
    }

    /// Read the current state
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Overwrite the current state
    pub fn set(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Transition from `current` to `new` only if the state is still
    /// `current`. Returns the witnessed state on failure.
    pub fn compare_exchange(
        &self,
        current: ConnectionState,
        new: ConnectionState,
    ) -> std::result::Result<ConnectionState, ConnectionState> {
        self.state
            .compare_exchange(
                current.as_u8(),
                new.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(ConnectionState::from_u8)
            .map_err(ConnectionState::from_u8)
    }

    /// Check if the connection is live
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }

    /// Check if a connection attempt is in progress (first or retry)
    #[inline]
    pub fn is_connecting(&self) -> bool {
        matches!(
            self.get(),
            ConnectionState::Connecting | ConnectionState::Reconnecting
        )
    }

    /// Check if there is no connection and no attempt in progress
    #[inline]
    pub fn is_disconnected(&self) -> bool {
        self.get() == ConnectionState::Disconnected
    }

    /// Check if an intentional teardown is in progress
    #[inline]
    pub fn is_shutting_down(&self) -> bool {
        self.get() == ConnectionState::ShuttingDown
    }
}

/// Lock-free frame and reconnect counters for a session
#[derive(Default)]
pub struct AtomicSessionMetrics {
    frames_sent: AtomicU64,
    frames_received: AtomicU64,
    reconnect_count: AtomicU64,
}

impl AtomicSessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnects(&self) {
        self.reconnect_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::Relaxed)
    }
}
