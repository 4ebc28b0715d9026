//! Transient display contract
//!
//! The toast layer is an external collaborator: the provider tells it what
//! to show and for how long, and nothing more. Rendering belongs to the
//! embedding application.

use crate::classify::Severity;
use crate::notification::Notification;
use std::time::Duration;
use tracing::{error, info, warn};

/// Sink for transient notification displays
pub trait ToastSink: Send + Sync {
    /// Show a transient display for the given notification
    ///
    /// `duration` is derived from the notification's severity and is how
    /// long the display should stay visible.
    fn toast(&self, notification: &Notification, duration: Duration);
}

/// Default sink that logs toasts at a severity-matched level
pub struct TracingToastSink;

impl ToastSink for TracingToastSink {
    fn toast(&self, notification: &Notification, duration: Duration) {
        let message = notification.message.as_deref().unwrap_or("");
        match notification.severity {
            Severity::Success | Severity::Info => info!(
                icon = %notification.icon,
                title = %notification.title,
                message = %message,
                duration_secs = duration.as_secs(),
                "toast"
            ),
            Severity::Warning => warn!(
                icon = %notification.icon,
                title = %notification.title,
                message = %message,
                duration_secs = duration.as_secs(),
                "toast"
            ),
            Severity::Error => error!(
                icon = %notification.icon,
                title = %notification.title,
                message = %message,
                duration_secs = duration.as_secs(),
                "toast"
            ),
        }
    }
}

/// Sink that drops every toast
///
/// For headless embedding where no transient surface exists.
pub struct NullToastSink;

impl ToastSink for NullToastSink {
    fn toast(&self, _notification: &Notification, _duration: Duration) {}
}
