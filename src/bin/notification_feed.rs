//! Notification feed binary
//!
//! Opens a subject's realtime notification channel and logs classified
//! notifications and channel lifecycle events until interrupted. Useful for
//! smoke-testing a deployment's realtime path without a browser.

use anyhow::Result;
use creator_notify::{
    init_tracing, NotificationProvider, RealtimeConfig, ShutdownManager, Subject, SubjectKind,
};
use creatorhub_realtime::bin_common::{load_config_from_env, BinaryRunner, ConfigType, RunConfig};
use livewire::SessionEvent;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

struct FeedApp {
    run_config: RunConfig,
    provider: Arc<NotificationProvider>,
    shutdown: ShutdownManager,
    last_unread: usize,
}

impl FeedApp {
    fn new(provider: Arc<NotificationProvider>, shutdown: ShutdownManager) -> Self {
        Self {
            run_config: RunConfig::new("notification-feed"),
            provider,
            shutdown,
            last_unread: 0,
        }
    }

    fn log_session_event(event: SessionEvent) {
        match event {
            SessionEvent::Connected => info!("[Feed] Channel connected"),
            SessionEvent::Disconnected => warn!("[Feed] Channel disconnected"),
            SessionEvent::Reconnecting(attempt) => {
                warn!("[Feed] Reconnecting (attempt {})", attempt)
            }
            SessionEvent::Error(err) => warn!("[Feed] Channel error: {}", err),
        }
    }
}

impl BinaryRunner for FeedApp {
    async fn run(&mut self) -> Result<()> {
        self.provider.open();

        loop {
            // Check shutdown flag first (highest priority)
            if !self.shutdown.is_running() {
                info!("[Feed] Shutdown signal received");
                break;
            }

            match self.provider.try_recv_event() {
                Some(event) => Self::log_session_event(event),
                None => {
                    tokio::time::sleep(Duration::from_millis(
                        self.run_config.poll_interval_ms,
                    ))
                    .await
                }
            }

            let unread = self.provider.unread_count();
            if unread != self.last_unread {
                info!(
                    "[Feed] {} notifications, {} unread",
                    self.provider.notifications().len(),
                    unread
                );
                self.last_unread = unread;
            }
        }

        info!("[Feed] Closing channel");
        self.provider.close().await;
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

fn subject_from_env() -> Subject {
    let kind = std::env::var("NOTIFY_SUBJECT_KIND")
        .ok()
        .and_then(|s| SubjectKind::parse(&s))
        .unwrap_or(SubjectKind::Creator);
    let id = std::env::var("NOTIFY_SUBJECT_ID").unwrap_or_else(|_| "demo-creator".to_string());
    Subject::new(kind, id)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config_path = load_config_from_env(ConfigType::Realtime);
    let config = if config_path.exists() {
        RealtimeConfig::load(&config_path)?
    } else {
        info!(
            "No config file at {}, using defaults",
            config_path.display()
        );
        RealtimeConfig::default()
    };

    let subject = subject_from_env();
    info!("Subject: {}", subject);

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let provider = Arc::new(NotificationProvider::new(subject, config));

    let mut app = FeedApp::new(provider, shutdown);
    app.execute().await
}
