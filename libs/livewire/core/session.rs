use crate::config::SessionConfig;
use crate::connection_state::{AtomicConnectionState, AtomicSessionMetrics, ConnectionState};
use crate::liveness::LivenessTracker;
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Internal command messages for session control
#[derive(Debug)]
enum SessionCommand {
    /// Send a frame over the channel
    Send(Frame),
    /// Shut the session down
    Shutdown,
}

/// Lifecycle events emitted by the session for its owner
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Connected to the peer
    Connected,
    /// Lost the connection (or closed it)
    Disconnected,
    /// A reconnection attempt is about to be made (attempt number)
    Reconnecting(usize),
    /// A transport-level error occurred
    Error(String),
}

/// Session metrics snapshot
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// A persistent channel session with event routing
///
/// Owns exactly one WebSocket connection at a time and keeps it alive:
/// - Atomic connection state readable from any thread
/// - Unbounded crossbeam channels between the I/O task and handlers
/// - Heartbeat probes and liveness timeout for half-open detection
/// - Reconnection with pluggable backoff after unexpected closures
///
/// Outbound frames sent while disconnected are dropped, not queued: the
/// session offers no store-and-forward guarantee for control frames.
///
/// # Type Parameters
/// - `R`: EventRouter implementation
/// - `E`: Event type (determined by the router)
pub struct ChannelSession<R, E>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    /// Session configuration (kept alive for the handler channels)
    #[allow(dead_code)]
    config: Arc<SessionConfig<R, E>>,
    /// Atomic connection state
    state: Arc<AtomicConnectionState>,
    /// Atomic metrics
    metrics: Arc<AtomicSessionMetrics>,
    /// Command channel sender
    command_tx: Sender<SessionCommand>,
    /// Event channel receiver
    event_rx: Receiver<SessionEvent>,
    /// Main task handle (tokio task for async I/O)
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// Handler thread handles (dedicated OS threads for event processing)
    pub(crate) handler_handles: Vec<std::thread::JoinHandle<()>>,
    /// Shutdown flag reference
    shutdown_flag: Arc<AtomicBool>,
}

impl<R, E> ChannelSession<R, E>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    /// Create a new session from configuration
    ///
    /// Called by the builder's `build()` method; use
    /// `livewire::builder()` to construct a session.
    pub(crate) fn new(config: SessionConfig<R, E>) -> Self {
        let config = Arc::new(config);
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected));
        let metrics = Arc::new(AtomicSessionMetrics::new());
        let shutdown_flag = Arc::clone(&config.shutdown_flag);

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let task_handle = {
            let config = Arc::clone(&config);
            let state = Arc::clone(&state);
            let metrics = Arc::clone(&metrics);

            tokio::spawn(async move {
                run_session(config, state, metrics, command_rx, event_tx).await;
            })
        };

        Self {
            config,
            state,
            metrics,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            handler_handles: Vec::new(), // Builder populates this
            shutdown_flag,
        }
    }

    /// Send a frame over the channel
    ///
    /// If the session is not currently connected the frame is dropped with a
    /// debug log entry. This never errors and never queues: outbound control
    /// frames are best-effort by contract.
    pub fn send(&self, frame: Frame) {
        if !self.state.is_connected() {
            debug!("Dropping outbound frame: session not connected");
            return;
        }
        if self
            .command_tx
            .send(SessionCommand::Send(frame))
            .is_err()
        {
            debug!("Dropping outbound frame: session task gone");
        }
    }

    /// Get the current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Check if the session is connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Get a metrics snapshot
    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            frames_sent: self.metrics.frames_sent(),
            frames_received: self.metrics.frames_received(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive a lifecycle event (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive a lifecycle event (blocking)
    pub fn recv_event(&self) -> std::result::Result<SessionEvent, crossbeam_channel::RecvError> {
        self.event_rx.recv()
    }

    /// Get a reference to the shutdown flag
    ///
    /// External code can trigger graceful shutdown by storing `false`; the
    /// flag is checked before every reconnection attempt and during backoff
    /// waits.
    pub fn shutdown_flag(&self) -> &Arc<AtomicBool> {
        &self.shutdown_flag
    }

    /// Shut the session down
    ///
    /// Deterministic teardown: the shutdown flag is cleared first so any
    /// pending backoff wait cancels instead of dialing again, then the live
    /// connection (with its heartbeat) is closed, then handler threads are
    /// joined.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down channel session");

        // Prevent any further reconnection scheduling
        self.shutdown_flag
            .store(false, std::sync::atomic::Ordering::Release);
        self.state.set(ConnectionState::ShuttingDown);

        let _ = self.command_tx.send(SessionCommand::Shutdown);

        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }

        // Dropping the config drops the route senders, closing the handler
        // channels so the handler threads exit
        drop(self.config);

        debug!(
            "Waiting for {} handler threads to complete",
            self.handler_handles.len()
        );
        for handle in self.handler_handles {
            let _ = handle.join();
        }

        info!("Channel session shut down");
        Ok(())
    }
}

/// Main session task loop: connect, serve, back off, repeat
async fn run_session<R, E>(
    config: Arc<SessionConfig<R, E>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicSessionMetrics>,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
) where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    let mut reconnect_attempt = 0;
    let shutdown_flag = &config.shutdown_flag;

    // One tracker for the session's lifetime, reset on each connect
    let liveness_tracker = config
        .liveness
        .as_ref()
        .map(|lc| LivenessTracker::new(lc.timeout));

    loop {
        // Shutdown flag has highest priority at every decision point
        if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
            debug!("Shutdown flag is false, exiting session loop");
            break;
        }

        if state.is_shutting_down() {
            debug!("Session is shutting down, exiting session loop");
            break;
        }

        state.set(if reconnect_attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting
        });

        if reconnect_attempt > 0 {
            let _ = event_tx.send(SessionEvent::Reconnecting(reconnect_attempt));
        }

        match connect_async(config.url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!("Connected to {}", config.url);
                state.set(ConnectionState::Connected);
                let _ = event_tx.send(SessionEvent::Connected);

                // Successful connect resets the backoff schedule
                reconnect_attempt = 0;
                if let Some(tracker) = &liveness_tracker {
                    tracker.reset();
                }

                if let Err(e) = handle_connection(
                    ws_stream,
                    Arc::clone(&config),
                    Arc::clone(&state),
                    Arc::clone(&metrics),
                    &command_rx,
                    liveness_tracker.as_ref(),
                )
                .await
                {
                    error!("Connection error: {}", e);
                    let _ = event_tx.send(SessionEvent::Error(e.to_string()));
                }

                state.set(ConnectionState::Disconnected);
                let _ = event_tx.send(SessionEvent::Disconnected);
            }
            Err(e) => {
                error!("Failed to connect: {}", e);
                let _ = event_tx.send(SessionEvent::Error(e.to_string()));
                state.set(ConnectionState::Disconnected);
            }
        }

        // Frames queued while we were connected but never flushed are stale
        // now; the contract is drop, not store-and-forward
        let mut discarded = 0usize;
        while let Ok(cmd) = command_rx.try_recv() {
            if matches!(cmd, SessionCommand::Shutdown) {
                debug!("Shutdown command received after disconnect");
                return;
            }
            discarded += 1;
        }
        if discarded > 0 {
            debug!("Discarded {} outbound frames queued across disconnect", discarded);
        }

        if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
            debug!("Shutdown flag set during connection, stopping reconnection");
            break;
        }

        if state.is_shutting_down() {
            break;
        }

        match config.reconnect_policy.next_delay(reconnect_attempt) {
            Some(delay) => {
                info!(
                    "Reconnecting in {:?} (attempt {})",
                    delay,
                    reconnect_attempt + 1
                );

                // Sleep interruptibly so an explicit close cancels the
                // pending attempt instead of racing it
                let check_interval = std::time::Duration::from_millis(100);
                let mut elapsed = std::time::Duration::ZERO;

                while elapsed < delay {
                    if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
                        debug!("Shutdown flag set during backoff wait");
                        return;
                    }

                    let sleep_time = std::cmp::min(check_interval, delay - elapsed);
                    tokio::time::sleep(sleep_time).await;
                    elapsed += sleep_time;
                }

                // Counted before the attempt fires so the next failure's
                // delay grows even if this attempt dies immediately
                reconnect_attempt += 1;
                metrics.increment_reconnects();
            }
            None => {
                warn!(
                    "Reconnect policy exhausted after {} attempts; staying disconnected until reopened",
                    reconnect_attempt
                );
                break;
            }
        }
    }

    state.set(ConnectionState::Disconnected);
    info!("Session task exiting");
}

/// Serve one established connection until it ends
async fn handle_connection<R, E>(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    config: Arc<SessionConfig<R, E>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicSessionMetrics>,
    command_rx: &Receiver<SessionCommand>,
    liveness_tracker: Option<&LivenessTracker>,
) -> Result<()>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    let (mut write, mut read) = ws_stream.split();

    // Heartbeat lives exactly as long as this connection
    let heartbeat_handle = if let Some((interval, payload)) = &config.heartbeat {
        let (handle, shutdown_tx, probe_rx) =
            crate::heartbeat::spawn_heartbeat(*interval, payload.clone());
        Some((handle, shutdown_tx, probe_rx))
    } else {
        None
    };

    let result = frame_loop(
        &mut write,
        &mut read,
        config,
        state,
        metrics,
        command_rx,
        heartbeat_handle.as_ref().map(|(_, _, rx)| rx),
        liveness_tracker,
    )
    .await;

    // Signal the heartbeat task; it checks the channel in its loop and
    // exits cleanly without being aborted
    if let Some((_handle, shutdown_tx, _)) = heartbeat_handle {
        let _ = shutdown_tx.send(());
    }

    result
}

/// Frame processing loop for one live connection
#[allow(clippy::too_many_arguments)]
async fn frame_loop<R, E>(
    write: &mut futures::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
        Message,
    >,
    read: &mut futures::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    >,
    config: Arc<SessionConfig<R, E>>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicSessionMetrics>,
    command_rx: &Receiver<SessionCommand>,
    probe_rx: Option<&Receiver<Frame>>,
    liveness_tracker: Option<&LivenessTracker>,
) -> Result<()>
where
    R: EventRouter<Event = E>,
    E: Send + std::fmt::Debug + 'static,
{
    let shutdown_flag = &config.shutdown_flag;

    // Health is re-evaluated once per second; a connection whose probe went
    // unanswered past the timeout is torn down through the normal error path
    let mut health_ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    health_ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
            debug!("Shutdown flag detected in frame loop, closing connection");
            let _ = write.close().await;
            return Ok(());
        }

        if state.is_shutting_down() {
            debug!("Shutting down state detected in frame loop, closing connection");
            let _ = write.close().await;
            return Ok(());
        }

        tokio::select! {
            // Inbound frames
            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        metrics.increment_received();

                        if let Some(frame) = tungstenite_to_frame(msg) {
                            // Liveness responses are swallowed before routing:
                            // they prove the peer is alive and carry nothing else
                            if let Some(lc) = &config.liveness {
                                if lc.detector.is_probe_response(&frame) {
                                    debug!("Liveness response received");
                                    if let Some(tracker) = liveness_tracker {
                                        tracker.record_response_received();
                                    }
                                    continue;
                                }
                            }

                            if !shutdown_flag.load(std::sync::atomic::Ordering::Acquire) {
                                debug!("Shutdown detected, skipping frame parsing");
                                continue;
                            }

                            // Parsed inline on the I/O task: events must reach
                            // their route in receipt order
                            match config.router.parse(frame).await {
                                Ok(event) => {
                                    let route_key = config.router.route_key(&event);

                                    if let Some(sender) = config.route_senders.get(&route_key) {
                                        // A send failure means the channel closed,
                                        // which only happens during shutdown
                                        let _ = sender.send(event);
                                    } else {
                                        warn!("No handler configured for route key: {:?}", route_key);
                                    }
                                }
                                Err(e) => {
                                    // Malformed frame: logged and dropped, never fatal
                                    error!("Parse error: {}", e);
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        return Err(LivewireError::WebSocket(e.to_string()));
                    }
                    None => {
                        warn!("WebSocket stream closed");
                        return Err(LivewireError::ConnectionClosed("Stream ended".into()));
                    }
                }
            }

            // Commands (spawn_blocking with timeout so select stays live)
            cmd = async {
                let rx = command_rx.clone();
                tokio::task::spawn_blocking(move || {
                    rx.recv_timeout(std::time::Duration::from_millis(100))
                }).await.ok()
            } => {
                match cmd {
                    Some(Ok(SessionCommand::Send(frame))) => {
                        let tung_msg = frame_to_tungstenite(&frame);
                        write.send(tung_msg).await.map_err(|e| {
                            LivewireError::WebSocket(e.to_string())
                        })?;
                        metrics.increment_sent();
                    }
                    Some(Ok(SessionCommand::Shutdown)) => {
                        info!("Received shutdown command");
                        state.set(ConnectionState::ShuttingDown);
                        return Ok(());
                    }
                    Some(Err(_)) => {
                        // Timeout is normal, continue the loop
                    }
                    None => {
                        debug!("Command channel closed");
                        return Ok(());
                    }
                }
            }

            // Heartbeat probes from the dedicated heartbeat task
            probe = async {
                if let Some(rx) = probe_rx {
                    let rx_clone = rx.clone();
                    tokio::task::spawn_blocking(move || {
                        rx_clone.recv_timeout(std::time::Duration::from_millis(100))
                    }).await.ok().and_then(|r| r.ok())
                } else {
                    std::future::pending().await
                }
            } => {
                if let Some(frame) = probe {
                    debug!("Sending liveness probe");
                    let tung_msg = frame_to_tungstenite(&frame);
                    write.send(tung_msg).await.map_err(|e| {
                        LivewireError::WebSocket(format!("Failed to send probe: {}", e))
                    })?;
                    metrics.increment_sent();
                    if let Some(tracker) = liveness_tracker {
                        tracker.record_probe_sent();
                    }
                }
            }

            // Periodic liveness health check
            _ = health_ticker.tick() => {
                if let Some(tracker) = liveness_tracker {
                    if !tracker.is_healthy() {
                        warn!("Liveness probe unanswered past timeout, dropping connection");
                        let _ = write.close().await;
                        return Err(LivewireError::LivenessTimeout(
                            "no response to liveness probe".into(),
                        ));
                    }
                }
            }
        }
    }
}

/// Convert a Frame to a tungstenite Message
fn frame_to_tungstenite(frame: &Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.clone()),
        Frame::Binary(data) => Message::Binary(data.clone()),
    }
}

/// Convert a tungstenite Message to a Frame
///
/// Protocol-level ping/pong/close frames are handled by tungstenite itself
/// and never surface here as data.
fn tungstenite_to_frame(msg: Message) -> Option<Frame> {
    match msg {
        Message::Text(text) => Some(Frame::Text(text)),
        Message::Binary(data) => Some(Frame::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
