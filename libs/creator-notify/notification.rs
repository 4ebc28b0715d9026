//! Client-owned notification records
//!
//! A [`Notification`] is created exactly once, when a raw event is
//! classified; after that only its `read` flag changes. Ids are generated
//! locally (kind + emitted-at + random suffix) so duplicate timestamps
//! never collide. There is deliberately no deduplication by business
//! identity: if the backend redelivers an event, the user sees it twice,
//! matching the transport's at-most-once semantics.

use crate::classify::{classify, Severity};
use crate::event::{EventKind, RawEvent};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// A classified, display-ready notification
#[derive(Debug, Clone)]
pub struct Notification {
    /// Locally generated unique id
    pub id: String,
    /// The classified event kind
    pub kind: EventKind,
    /// Display icon
    pub icon: String,
    /// Display title
    pub title: String,
    /// Semantic severity
    pub severity: Severity,
    /// Human-readable message from the payload, used verbatim
    pub message: Option<String>,
    /// The full event payload, passed through to consumers unmodified
    pub payload: serde_json::Map<String, Value>,
    /// When this client received the event
    pub received_at: DateTime<Utc>,
    /// Read/unread state; the only mutable field
    pub read: bool,
}

impl Notification {
    /// Classify a raw event into a notification
    pub fn from_raw(event: RawEvent) -> Self {
        let kind = EventKind::from_tag(&event.kind);
        let presentation = classify(&kind);
        let received_at = Utc::now();

        let emitted_ms = event
            .timestamp
            .unwrap_or(received_at)
            .timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!("{}-{}-{}", kind.tag(), emitted_ms, &suffix[..8]);

        let message = event.message().map(str::to_string);

        Self {
            id,
            kind,
            icon: presentation.icon.to_string(),
            title: presentation.title.to_string(),
            severity: presentation.severity,
            message,
            payload: event.data,
            received_at,
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_classification_scenario() {
        let event = raw(
            r#"{
                "type": "proposal_approved",
                "data": {"message": "Your proposal was approved", "project_id": "p1"},
                "timestamp": "2024-01-01T00:00:00Z"
            }"#,
        );

        let n = Notification::from_raw(event);
        assert_eq!(n.kind, EventKind::ProposalApproved);
        assert_eq!(n.severity, Severity::Success);
        assert!(n.title.contains("Approved"));
        assert_eq!(n.message.as_deref(), Some("Your proposal was approved"));
        assert_eq!(
            n.severity.display_duration(),
            std::time::Duration::from_secs(5)
        );
        // Domain references pass through untouched
        assert_eq!(
            n.payload.get("project_id").and_then(Value::as_str),
            Some("p1")
        );
        assert!(!n.read);
    }

    #[test]
    fn test_id_embeds_kind_and_timestamp() {
        let event = raw(
            r#"{"type": "system_alert", "timestamp": "2024-01-01T00:00:00Z"}"#,
        );
        let n = Notification::from_raw(event);
        assert!(n.id.starts_with("system_alert-1704067200000-"));
    }

    #[test]
    fn test_duplicate_timestamps_get_distinct_ids() {
        let json = r#"{"type": "system_alert", "timestamp": "2024-01-01T00:00:00Z"}"#;
        let a = Notification::from_raw(raw(json));
        let b = Notification::from_raw(raw(json));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_unknown_kind_still_surfaces() {
        let n = Notification::from_raw(raw(r#"{"type": "brand_new_thing"}"#));
        assert!(n.kind.is_unclassified());
        assert_eq!(n.title, "Notification");
        assert_eq!(n.icon, "🔔");
        assert_eq!(n.severity, Severity::Info);
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_receipt_time() {
        let n = Notification::from_raw(raw(r#"{"type": "connected"}"#));
        // Id still has three segments: tag, millis, suffix
        assert_eq!(n.id.matches('-').count(), 2);
    }
}
