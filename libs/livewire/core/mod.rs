//! Core session machinery: builder, session loop, state, heartbeat,
//! liveness tracking.

pub mod builder;
pub mod config;
pub mod connection_state;
pub mod heartbeat;
pub mod liveness;
pub mod session;

// Re-export main types
pub use builder::{states, RouteSet, SessionBuilder};
pub use config::SessionConfig;
pub use connection_state::{AtomicConnectionState, AtomicSessionMetrics, ConnectionState};
pub use liveness::LivenessTracker;
pub use session::{ChannelSession, SessionEvent, SessionMetrics};

// Re-export traits for convenience
pub use crate::traits::*;
