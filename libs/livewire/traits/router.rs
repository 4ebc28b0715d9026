//! Event Routing
//!
//! Core traits for turning raw frames into typed events and dispatching
//! them to per-route handlers with per-route ordering guarantees.
//!
//! # Architecture
//!
//! ```text
//! WebSocket → LivenessDetector? → Router → Route Key → Channel → Handler Thread
//!                                              ↓              ↓
//!                                         RouteA Channel → RouteA Handler (sequential)
//!                                         RouteB Channel → RouteB Handler (sequential)
//! ```
//!
//! # Ordering Guarantees
//!
//! - **Per-route sequential**: events with the same route key are handled in
//!   receipt order
//! - **Cross-route parallel**: different route keys are handled concurrently
//! - **Lock-free**: unbounded crossbeam channels, no backpressure

use crate::{Frame, Result};
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;

/// Router that parses raw frames into typed events and determines routing.
///
/// The router has two responsibilities:
/// 1. Parse the raw frame into a typed event
/// 2. Extract a route key that decides which handler processes it
///
/// A `parse` error means the frame was malformed; the session logs it and
/// drops the frame without tearing down the connection.
#[async_trait]
pub trait EventRouter: Send + Sync + 'static {
    /// The parsed event type
    type Event: Send + Debug + 'static;

    /// The route key type (determines which handler processes the event)
    type RouteKey: Hash + Eq + Clone + Send + Sync + Debug + 'static;

    /// Parse a raw frame into a typed event.
    ///
    /// Called for every inbound frame that is not a liveness response.
    async fn parse(&self, frame: Frame) -> Result<Self::Event>;

    /// Extract the route key from a parsed event.
    ///
    /// Events with the same route key are handled sequentially in order;
    /// events with different route keys are handled in parallel.
    fn route_key(&self, event: &Self::Event) -> Self::RouteKey;
}

/// Handler that processes typed events sequentially.
///
/// Each handler runs on its own dedicated OS thread and receives events in
/// the order they arrived. Handlers for different route keys run in parallel
/// on separate threads.
///
/// **Important**: `handle` runs on a plain thread, not in an async context.
/// It should perform blocking work directly without async/await.
pub trait EventHandler<E>: Send + 'static
where
    E: Send + Debug + 'static,
{
    /// Handle a parsed event.
    ///
    /// # Errors
    /// An error is logged and the handler thread continues with the next
    /// event.
    fn handle(&mut self, event: E) -> Result<()>;
}
