//! # Livewire Traits
//!
//! Core traits and types for the livewire channel-session library:
//!
//! - **EventRouter / EventHandler**: parse inbound frames and dispatch them
//!   with per-route ordering
//! - **LivenessDetector**: recognize liveness responses so they are swallowed
//!   before routing
//! - **ReconnectPolicy**: control backoff after an unexpected closure

pub mod error;
pub mod frame;
pub mod liveness;
pub mod reconnect;
pub mod router;

// Re-export commonly used types
pub use error::{LivewireError, Result};
pub use frame::Frame;
pub use liveness::{LivenessDetector, NoopLivenessDetector, TextLivenessDetector};
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectPolicy};
pub use router::{EventHandler, EventRouter};
