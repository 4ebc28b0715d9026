//! # Livewire
//!
//! A persistent WebSocket channel-session library for realtime clients.
//!
//! ## Features
//!
//! - **Lock-free state**: atomic connection state and counters, unbounded
//!   crossbeam channels between the I/O task and handlers
//! - **Type-state builder**: compile-time guarantees for required
//!   configuration
//! - **Liveness heartbeating**: periodic probes with a response timeout so
//!   half-open connections are detected and torn down
//! - **Pluggable reconnection**: exponential backoff with a ceiling and an
//!   attempt cap, or any custom policy
//! - **Per-route ordering**: events with the same route key are handled
//!   sequentially on a dedicated thread; different routes run in parallel
//!
//! ## Example
//!
//! ```rust,ignore
//! let session = livewire::builder()
//!     .url("wss://api.example.com/ws/notifications/creator/c42")
//!     .router(MyRouter, |routes| routes.handler(Route::Ingest, MyHandler::new()))
//!     .heartbeat(Duration::from_secs(30), Frame::Text("ping".into()))
//!     .liveness_detector(TextLivenessDetector::new("pong"))
//!     .liveness_timeout(Duration::from_secs(90))
//!     .reconnect_policy(ExponentialBackoff::new(
//!         Duration::from_secs(1),
//!         Duration::from_secs(30),
//!         Some(5),
//!     ))
//!     .build()?;
//!
//! session.send(Frame::Text("ack:some-id".into()));
//!
//! while let Ok(event) = session.recv_event() {
//!     println!("Event: {:?}", event);
//! }
//! ```

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core session functionality
pub use crate::core::{
    builder, config, connection_state, heartbeat, liveness, session,
    builder::{states, RouteSet, SessionBuilder},
    config::SessionConfig,
    connection_state::{AtomicConnectionState, AtomicSessionMetrics, ConnectionState},
    liveness::LivenessTracker,
    session::{ChannelSession, SessionEvent, SessionMetrics},
};

/// Create a new session builder
///
/// Convenience entry point for the builder pattern.
///
/// # Example
/// ```ignore
/// let session = livewire::builder()
///     .url("wss://api.example.com/ws")
///     .router(MyRouter, |routes| routes.handler(Route::Ingest, MyHandler))
///     .build()?;
/// ```
pub fn builder() -> SessionBuilder<states::NoUrl, states::NoRouter, (), ()> {
    SessionBuilder::new()
}
