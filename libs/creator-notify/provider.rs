//! Notification provider
//!
//! Owns exactly one channel session per provider instance, scoped to one
//! subject for its whole lifetime. Inbound events flow through the router
//! (parse), the ingest handler (classify, append, toast), and out to
//! consumers through the store snapshot API. Consumers never touch
//! transport internals; sharing a stream across consumers is done by
//! cloning an `Arc<NotificationProvider>`, not by module-level globals.

use crate::config::RealtimeConfig;
use crate::event::RawEvent;
use crate::notification::Notification;
use crate::store::NotificationStore;
use crate::subject::{channel_url, Subject};
use crate::toast::{ToastSink, TracingToastSink};
use livewire::{
    ChannelSession, ConnectionState, EventHandler, EventRouter, ExponentialBackoff, Frame,
    LivewireError, SessionEvent, TextLivenessDetector,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outbound liveness probe token
pub const LIVENESS_PROBE: &str = "ping";
/// Inbound liveness response token; frames equal to this are swallowed
pub const LIVENESS_RESPONSE: &str = "pong";

/// Route keys for the notification channel
///
/// Everything that parses lands on the single ingest route: notifications
/// for one subject are strictly ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotifyRoute {
    Ingest,
}

/// Router that parses inbound frames into raw events
///
/// Liveness responses never reach this router; the session swallows them
/// first. A frame that fails to parse is logged by the session and dropped
/// without affecting the connection.
pub struct NotificationRouter;

#[async_trait::async_trait]
impl EventRouter for NotificationRouter {
    type Event = RawEvent;
    type RouteKey = NotifyRoute;

    async fn parse(&self, frame: Frame) -> livewire::Result<Self::Event> {
        let text = frame.as_text().ok_or_else(|| {
            LivewireError::Parse("binary frame on notification channel".into())
        })?;
        serde_json::from_str(text)
            .map_err(|e| LivewireError::Parse(format!("malformed event: {}", e)))
    }

    fn route_key(&self, _event: &Self::Event) -> Self::RouteKey {
        NotifyRoute::Ingest
    }
}

/// Handler that classifies raw events and feeds the store
pub struct IngestHandler {
    store: Arc<RwLock<NotificationStore>>,
    toasts: Arc<dyn ToastSink>,
}

impl IngestHandler {
    pub fn new(store: Arc<RwLock<NotificationStore>>, toasts: Arc<dyn ToastSink>) -> Self {
        Self { store, toasts }
    }
}

impl EventHandler<RawEvent> for IngestHandler {
    fn handle(&mut self, event: RawEvent) -> livewire::Result<()> {
        let notification = Notification::from_raw(event);
        debug!(
            id = %notification.id,
            kind = notification.kind.tag(),
            "Ingesting notification"
        );

        let duration = notification.severity.display_duration();
        self.store.write().append(notification.clone());
        self.toasts.toast(&notification, duration);
        Ok(())
    }
}

/// Shape of the acknowledgment frame for a notification id
fn ack_frame(id: &str) -> Frame {
    Frame::Text(format!("ack:{}", id))
}

/// Component-owned realtime notification provider
///
/// Created when an identity becomes available, closed when it goes away.
/// The subject binding is immutable; an identity change means closing this
/// provider and creating a new one.
pub struct NotificationProvider {
    subject: Subject,
    config: RealtimeConfig,
    store: Arc<RwLock<NotificationStore>>,
    toasts: Arc<dyn ToastSink>,
    session: Mutex<Option<ChannelSession<NotificationRouter, RawEvent>>>,
}

impl NotificationProvider {
    /// Create a provider for a subject with the default toast sink
    pub fn new(subject: Subject, config: RealtimeConfig) -> Self {
        Self::with_toast_sink(subject, config, Arc::new(TracingToastSink))
    }

    /// Create a provider with a custom toast sink
    pub fn with_toast_sink(
        subject: Subject,
        config: RealtimeConfig,
        toasts: Arc<dyn ToastSink>,
    ) -> Self {
        let store = Arc::new(RwLock::new(NotificationStore::with_retention(
            config.retention_ceiling,
        )));
        Self {
            subject,
            config,
            store,
            toasts,
            session: Mutex::new(None),
        }
    }

    /// Open the channel session
    ///
    /// No-op (with a warning) when the subject is invalid or a live session
    /// already exists. A session left disconnected (reconnect schedule
    /// exhausted) is replaced with a fresh one; this is the external trigger
    /// that ends sticky disconnection. Must be called from within a Tokio
    /// runtime.
    pub fn open(&self) {
        if !self.subject.is_valid() {
            warn!(subject = %self.subject, "Not opening channel: subject has no id");
            return;
        }

        let mut slot = self.session.lock();
        if let Some(existing) = slot.as_ref() {
            if existing.connection_state() != ConnectionState::Disconnected {
                warn!(subject = %self.subject, "Channel already open");
                return;
            }
            info!(subject = %self.subject, "Reopening disconnected channel");
        }
        if let Some(stale) = slot.take() {
            // Wind the stale session down without joining its threads; they
            // exit on the cleared flag
            stale
                .shutdown_flag()
                .store(false, std::sync::atomic::Ordering::Release);
        }

        let url = match channel_url(&self.config.service_origin, &self.subject) {
            Ok(url) => url,
            Err(e) => {
                warn!(subject = %self.subject, error = %e, "Not opening channel");
                return;
            }
        };

        info!(subject = %self.subject, url = %url, "Opening notification channel");

        let handler = IngestHandler::new(Arc::clone(&self.store), Arc::clone(&self.toasts));
        let session = livewire::builder()
            .url(url)
            .router(NotificationRouter, move |routes| {
                routes.handler(NotifyRoute::Ingest, handler)
            })
            .heartbeat(
                self.config.heartbeat_interval(),
                Frame::Text(LIVENESS_PROBE.to_string()),
            )
            .liveness_detector(TextLivenessDetector::new(LIVENESS_RESPONSE))
            .liveness_timeout(self.config.liveness_timeout())
            .reconnect_policy(ExponentialBackoff::new(
                self.config.backoff_base(),
                self.config.backoff_max(),
                Some(self.config.max_reconnect_attempts),
            ))
            .build();

        match session {
            Ok(session) => *slot = Some(session),
            Err(e) => warn!(subject = %self.subject, error = %e, "Failed to build session"),
        }
    }

    /// Close the channel session
    ///
    /// Deterministic teardown: any pending reconnect and the heartbeat are
    /// cancelled before the socket closes. Idempotent.
    pub async fn close(&self) {
        let session = self.session.lock().take();
        if let Some(session) = session {
            info!(subject = %self.subject, "Closing notification channel");
            if let Err(e) = session.shutdown().await {
                warn!(subject = %self.subject, error = %e, "Error during channel shutdown");
            }
        }
    }

    /// The subject this provider is bound to
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Whether the channel is currently connected
    pub fn connected(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.is_connected())
            .unwrap_or(false)
    }

    /// Newest-first snapshot of the stored notifications
    pub fn notifications(&self) -> Vec<Notification> {
        self.store.read().snapshot()
    }

    /// Number of unread notifications
    pub fn unread_count(&self) -> usize {
        self.store.read().unread_count()
    }

    /// Mark one notification read
    pub fn mark_read(&self, id: &str) {
        self.store.write().mark_read(id);
    }

    /// Mark every notification read
    pub fn mark_all_read(&self) {
        self.store.write().mark_all_read();
    }

    /// Empty the store
    pub fn clear(&self) {
        self.store.write().clear();
    }

    /// Dismiss one notification
    pub fn dismiss(&self, id: &str) {
        self.store.write().remove(id);
    }

    /// Acknowledge a notification over the channel
    ///
    /// Best-effort: dropped silently when the channel is not connected.
    pub fn send_ack(&self, id: &str) {
        match &*self.session.lock() {
            Some(session) => session.send(ack_frame(id)),
            None => debug!(id = id, "Ack dropped: channel not open"),
        }
    }

    /// Drain one session lifecycle event, if any (non-blocking)
    pub fn try_recv_event(&self) -> Option<SessionEvent> {
        self.session.lock().as_ref().and_then(|s| s.try_recv_event())
    }
}

impl Drop for NotificationProvider {
    /// Last-resort teardown for a provider dropped without `close()`: clear
    /// the shutdown flag so the session task stops reconnecting and winds
    /// down. Handler threads are not joined here; `close()` is the orderly
    /// path.
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session
                .shutdown_flag()
                .store(false, std::sync::atomic::Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Severity;
    use crate::subject::SubjectKind;
    use std::time::Duration;

    struct CollectingToastSink {
        seen: Mutex<Vec<(String, Duration)>>,
    }

    impl CollectingToastSink {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ToastSink for CollectingToastSink {
        fn toast(&self, notification: &Notification, duration: Duration) {
            self.seen
                .lock()
                .push((notification.title.clone(), duration));
        }
    }

    #[tokio::test]
    async fn test_router_parses_structured_events() {
        let router = NotificationRouter;
        let frame = Frame::Text(
            r#"{"type": "revenue_milestone", "data": {"message": "You crossed $10k"}}"#
                .to_string(),
        );
        let event = router.parse(frame).await.unwrap();
        assert_eq!(event.kind, "revenue_milestone");
        assert_eq!(event.message(), Some("You crossed $10k"));
    }

    #[tokio::test]
    async fn test_router_rejects_malformed_frames() {
        let router = NotificationRouter;
        assert!(router.parse(Frame::Text("not json".to_string())).await.is_err());
        assert!(router.parse(Frame::Binary(vec![0xde, 0xad])).await.is_err());
    }

    #[test]
    fn test_ingest_appends_and_toasts() {
        let store = Arc::new(RwLock::new(NotificationStore::new()));
        let toasts = Arc::new(CollectingToastSink::new());
        let mut handler = IngestHandler::new(Arc::clone(&store), toasts.clone());

        let event: RawEvent = serde_json::from_str(
            r#"{"type": "proposal_approved", "data": {"message": "Your proposal was approved"}}"#,
        )
        .unwrap();
        handler.handle(event).unwrap();

        let snapshot = store.read().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].severity, Severity::Success);
        assert_eq!(store.read().unread_count(), 1);

        let seen = toasts.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Proposal Approved");
        assert_eq!(seen[0].1, Duration::from_secs(5));
    }

    #[test]
    fn test_ingest_unknown_kind_still_surfaces() {
        let store = Arc::new(RwLock::new(NotificationStore::new()));
        let toasts = Arc::new(CollectingToastSink::new());
        let mut handler = IngestHandler::new(Arc::clone(&store), toasts.clone());

        let event: RawEvent =
            serde_json::from_str(r#"{"type": "never_seen_before"}"#).unwrap();
        handler.handle(event).unwrap();

        let snapshot = store.read().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Notification");
        assert_eq!(toasts.seen.lock()[0].1, Duration::from_secs(4));
    }

    #[test]
    fn test_ack_frame_shape() {
        let frame = ack_frame("proposal_approved-1704067200000-ab12cd34");
        assert_eq!(
            frame.as_text(),
            Some("ack:proposal_approved-1704067200000-ab12cd34")
        );
    }

    #[test]
    fn test_open_with_empty_subject_is_noop() {
        let provider = NotificationProvider::new(
            Subject::new(SubjectKind::Creator, ""),
            RealtimeConfig::default(),
        );
        provider.open();
        assert!(!provider.connected());
        assert!(provider.session.lock().is_none());
    }

    #[test]
    fn test_store_operations_via_provider() {
        let provider = NotificationProvider::with_toast_sink(
            Subject::new(SubjectKind::Creator, "c1"),
            RealtimeConfig::default(),
            Arc::new(crate::toast::NullToastSink),
        );

        // Feed the store directly through an ingest handler, as the
        // session's handler thread would
        let mut handler = IngestHandler::new(
            Arc::clone(&provider.store),
            Arc::new(crate::toast::NullToastSink),
        );
        for _ in 0..3 {
            let event: RawEvent =
                serde_json::from_str(r#"{"type": "system_alert"}"#).unwrap();
            handler.handle(event).unwrap();
        }

        assert_eq!(provider.unread_count(), 3);
        let id = provider.notifications()[0].id.clone();

        provider.mark_read(&id);
        assert_eq!(provider.unread_count(), 2);

        provider.dismiss(&id);
        assert_eq!(provider.notifications().len(), 2);
        assert_eq!(provider.unread_count(), 2);

        provider.mark_all_read();
        assert_eq!(provider.unread_count(), 0);

        provider.clear();
        assert!(provider.notifications().is_empty());
        assert_eq!(provider.unread_count(), 0);
    }

    #[test]
    fn test_ack_without_session_is_silent() {
        let provider = NotificationProvider::new(
            Subject::new(SubjectKind::Admin, "ops-1"),
            RealtimeConfig::default(),
        );
        // Must not panic or error
        provider.send_ack("some-id");
    }
}
