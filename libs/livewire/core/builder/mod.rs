pub mod states;

use crate::config::{LivenessConfig, SessionConfig};
use crate::session::ChannelSession;
use crate::traits::*;
use states::*;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Type-state builder for [`ChannelSession`]
///
/// Uses the type system to enforce that the required fields (URL and router)
/// are set before the session can be built. Handlers are registered for each
/// route key the router produces.
pub struct SessionBuilder<U, Ro, R, E>
where
    U: UrlState,
    Ro: RouterState,
{
    _state: TypeState<U, Ro>,
    _router_type: PhantomData<R>,
    _event_type: PhantomData<E>,
    url: Option<String>,
    router: Option<R>,
    // Closure to build handlers - Box<dyn Any> avoids trait bound issues
    handler_builder: Option<Box<dyn std::any::Any + Send>>,
    heartbeat: Option<(Duration, Frame)>,
    liveness_detector: Option<Arc<dyn LivenessDetector>>,
    liveness_timeout: Option<Duration>,
    reconnect_policy: Option<Box<dyn ReconnectPolicy>>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl SessionBuilder<NoUrl, NoRouter, (), ()> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            _router_type: PhantomData,
            _event_type: PhantomData,
            url: None,
            router: None,
            handler_builder: None,
            heartbeat: None,
            liveness_detector: None,
            liveness_timeout: None,
            reconnect_policy: None,
            shutdown_flag: None,
        }
    }
}

impl Default for SessionBuilder<NoUrl, NoRouter, (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<Ro, R, E> SessionBuilder<NoUrl, Ro, R, E>
where
    Ro: RouterState,
{
    pub fn url(self, url: impl Into<String>) -> SessionBuilder<HasUrl, Ro, R, E> {
        SessionBuilder {
            _state: TypeState::new(),
            _router_type: PhantomData,
            _event_type: PhantomData,
            url: Some(url.into()),
            router: self.router,
            handler_builder: self.handler_builder,
            heartbeat: self.heartbeat,
            liveness_detector: self.liveness_detector,
            liveness_timeout: self.liveness_timeout,
            reconnect_policy: self.reconnect_policy,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

/// Route registration helper
///
/// Collects one handler per route key; each handler gets a dedicated OS
/// thread and an unbounded channel.
pub struct RouteSet<R>
where
    R: EventRouter,
{
    handlers: HashMap<
        R::RouteKey,
        (
            crossbeam_channel::Sender<R::Event>,
            crossbeam_channel::Receiver<R::Event>,
            Box<dyn EventHandler<R::Event>>,
        ),
    >,
}

impl<R> RouteSet<R>
where
    R: EventRouter,
{
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific route key
    pub fn handler<H>(mut self, route_key: R::RouteKey, handler: H) -> Self
    where
        H: EventHandler<R::Event>,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.handlers
            .insert(route_key, (sender, receiver, Box::new(handler)));
        self
    }

    fn build(
        self,
        shutdown_flag: Arc<AtomicBool>,
    ) -> (
        HashMap<R::RouteKey, crossbeam_channel::Sender<R::Event>>,
        Vec<std::thread::JoinHandle<()>>,
    ) {
        let mut senders = HashMap::new();
        let mut handles = Vec::new();

        for (route_key, (sender, receiver, handler)) in self.handlers {
            senders.insert(route_key.clone(), sender);

            let shutdown_flag = Arc::clone(&shutdown_flag);

            let handle = std::thread::spawn(move || {
                let mut handler = handler;

                loop {
                    match receiver.recv_timeout(std::time::Duration::from_millis(50)) {
                        Ok(event) => {
                            if let Err(e) = handler.handle(event) {
                                tracing::error!("Handler error for route {:?}: {}", route_key, e);
                            }
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                            if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
                                tracing::debug!(
                                    "Shutdown flag detected, handler thread for route {:?} exiting",
                                    route_key
                                );
                                break;
                            }
                            continue;
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                            tracing::debug!(
                                "Handler channel closed for route {:?}, thread exiting",
                                route_key
                            );
                            break;
                        }
                    }
                }
            });

            handles.push(handle);
        }

        (senders, handles)
    }
}

// Router setting
impl<U> SessionBuilder<U, NoRouter, (), ()>
where
    U: UrlState,
{
    pub fn router<NewR, F>(
        self,
        router: NewR,
        configure_routes: F,
    ) -> SessionBuilder<U, HasRouter, NewR, NewR::Event>
    where
        NewR: EventRouter,
        F: FnOnce(RouteSet<NewR>) -> RouteSet<NewR> + Send + 'static,
    {
        let routes = RouteSet::<NewR>::new();
        let routes = configure_routes(routes);

        // Store the route construction as a closure called at build time
        type HandlerBuilderFn<R> = Box<
            dyn FnOnce(
                    Arc<std::sync::atomic::AtomicBool>,
                ) -> (
                    HashMap<
                        <R as EventRouter>::RouteKey,
                        crossbeam_channel::Sender<<R as EventRouter>::Event>,
                    >,
                    Vec<std::thread::JoinHandle<()>>,
                ) + Send,
        >;

        let handler_builder: HandlerBuilderFn<NewR> =
            Box::new(move |shutdown_flag: Arc<std::sync::atomic::AtomicBool>| {
                routes.build(shutdown_flag)
            });

        let handler_builder_any = Box::new(handler_builder) as Box<dyn std::any::Any + Send>;

        SessionBuilder {
            _state: TypeState::new(),
            _router_type: PhantomData,
            _event_type: PhantomData,
            url: self.url,
            router: Some(router),
            handler_builder: Some(handler_builder_any),
            heartbeat: self.heartbeat,
            liveness_detector: self.liveness_detector,
            liveness_timeout: self.liveness_timeout,
            reconnect_policy: self.reconnect_policy,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

// Optional configuration methods
impl<U, R> SessionBuilder<U, HasRouter, R, R::Event>
where
    U: UrlState,
    R: EventRouter,
{
    /// Configure the heartbeat: emit `payload` every `interval` while
    /// connected
    pub fn heartbeat(mut self, interval: Duration, payload: Frame) -> Self {
        self.heartbeat = Some((interval, payload));
        self
    }

    /// Set the detector that recognizes liveness responses
    ///
    /// Recognized frames are swallowed before routing and recorded for
    /// health tracking. Use together with `liveness_timeout()`.
    pub fn liveness_detector(mut self, detector: impl LivenessDetector + 'static) -> Self {
        self.liveness_detector = Some(Arc::new(detector));
        self
    }

    /// Set the liveness timeout
    ///
    /// If no response arrives within this duration after a probe, the
    /// connection is considered dead and torn down through the normal
    /// reconnect path. Recommended: 3x the heartbeat interval.
    pub fn liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = Some(timeout);
        self
    }

    /// Set the reconnection policy applied after unexpected closures
    pub fn reconnect_policy(mut self, policy: impl ReconnectPolicy + 'static) -> Self {
        self.reconnect_policy = Some(Box::new(policy));
        self
    }

    /// Set a custom shutdown flag for coordinated shutdown
    ///
    /// When the flag is stored `false`, the session stops reconnecting and
    /// shuts down gracefully.
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

// Build method - only available when all required fields are set
impl<R> SessionBuilder<HasUrl, HasRouter, R, R::Event>
where
    R: EventRouter,
{
    pub fn build(self) -> Result<ChannelSession<R, R::Event>> {
        let url = self.url.expect("URL must be set");
        let router = Arc::new(self.router.expect("Router must be set"));

        let shutdown_flag = self
            .shutdown_flag
            .unwrap_or_else(|| Arc::new(AtomicBool::new(true)));

        let reconnect_policy = self
            .reconnect_policy
            .unwrap_or_else(|| Box::new(ExponentialBackoff::default()));

        let liveness = match (self.liveness_detector, self.liveness_timeout) {
            (Some(detector), Some(timeout)) => Some(LivenessConfig { detector, timeout }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(LivewireError::Configuration(
                    "liveness_detector and liveness_timeout must be set together".into(),
                ))
            }
            (None, None) => None,
        };

        let (route_senders, handler_handles) = if let Some(builder_any) = self.handler_builder {
            type HandlerBuilderFn<R> = Box<
                dyn FnOnce(
                        Arc<std::sync::atomic::AtomicBool>,
                    ) -> (
                        HashMap<
                            <R as EventRouter>::RouteKey,
                            crossbeam_channel::Sender<<R as EventRouter>::Event>,
                        >,
                        Vec<std::thread::JoinHandle<()>>,
                    ) + Send,
            >;

            let builder = builder_any
                .downcast::<HandlerBuilderFn<R>>()
                .expect("Handler builder type mismatch");

            (*builder)(Arc::clone(&shutdown_flag))
        } else {
            (HashMap::new(), Vec::new())
        };

        let config = SessionConfig {
            url,
            router,
            route_senders,
            heartbeat: self.heartbeat,
            liveness,
            reconnect_policy,
            shutdown_flag,
        };

        let mut session = ChannelSession::new(config);
        session.handler_handles = handler_handles;

        Ok(session)
    }
}
