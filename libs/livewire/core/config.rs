use crate::traits::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Liveness configuration: how responses are recognized and how long a probe
/// may go unanswered before the connection is declared dead.
pub(crate) struct LivenessConfig {
    pub(crate) detector: Arc<dyn LivenessDetector>,
    pub(crate) timeout: Duration,
}

/// Configuration for a [`ChannelSession`](crate::session::ChannelSession)
///
/// Holds everything needed to run a session with event routing. Built via
/// the type-state [`SessionBuilder`](crate::builder::SessionBuilder).
pub struct SessionConfig<R, E>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    /// Channel URL (wss:// or ws://)
    pub(crate) url: String,

    /// Router for parsing and routing inbound frames
    pub(crate) router: Arc<R>,

    /// Channel senders mapped by route key
    pub(crate) route_senders: HashMap<R::RouteKey, crossbeam_channel::Sender<E>>,

    /// Optional heartbeat configuration (interval, probe payload)
    pub(crate) heartbeat: Option<(Duration, Frame)>,

    /// Optional liveness detection (response token + timeout)
    pub(crate) liveness: Option<LivenessConfig>,

    /// Reconnection policy applied after unexpected closures
    pub(crate) reconnect_policy: Box<dyn ReconnectPolicy>,

    /// Shutdown flag - when false, no further reconnection is attempted
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}

impl<R, E> SessionConfig<R, E>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if a heartbeat is configured
    pub fn has_heartbeat(&self) -> bool {
        self.heartbeat.is_some()
    }

    /// Check if liveness detection is configured
    pub fn has_liveness(&self) -> bool {
        self.liveness.is_some()
    }

    /// Get the number of configured handlers
    pub fn handler_count(&self) -> usize {
        self.route_senders.len()
    }
}
