//! CreatorHub Realtime Notifications
//!
//! The client side of the platform's realtime notification delivery:
//! subject-scoped channel sessions, event classification, and the bounded
//! read/unread notification store that the UI treats as its single source
//! of truth.

pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod infrastructure;
pub mod notification;
pub mod provider;
pub mod store;
pub mod subject;
pub mod toast;

// Re-export commonly used items
pub use classify::{classify, Presentation, Severity};
pub use config::RealtimeConfig;
pub use error::{NotifyError, Result};
pub use event::{EventKind, RawEvent};
pub use infrastructure::{init_tracing, ShutdownManager};
pub use notification::Notification;
pub use provider::{
    IngestHandler, NotificationProvider, NotificationRouter, NotifyRoute, LIVENESS_PROBE,
    LIVENESS_RESPONSE,
};
pub use store::{NotificationStore, DEFAULT_RETENTION};
pub use subject::{channel_url, Subject, SubjectKind};
pub use toast::{NullToastSink, ToastSink, TracingToastSink};
