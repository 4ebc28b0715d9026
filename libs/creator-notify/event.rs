//! Wire-level event model
//!
//! Inbound frames carry JSON of the shape
//! `{"type": "...", "data": {...}, "timestamp": "..."}`. The `type` tag is
//! drawn from a closed vocabulary; an unrecognized tag still produces an
//! event (as `Unclassified`) so nothing is ever dropped silently.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Unparsed inbound event as received from the realtime channel
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Event tag (maps to [`EventKind`])
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque payload; the `message` key is used verbatim in presentation,
    /// all other keys pass through to consumers unmodified
    #[serde(default)]
    pub data: serde_json::Map<String, Value>,

    /// Timestamp assigned by the sender
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawEvent {
    /// The human-readable message carried in the payload, if any
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

/// The closed vocabulary of event kinds the platform emits
///
/// Unknown wire tags map to `Unclassified`, which carries the original tag
/// so it survives into logs and acknowledgments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    // Proposal lifecycle
    ProposalSubmitted,
    ProposalApproved,
    ProposalRejected,
    ProposalUnderReview,
    // AI insight lifecycle
    InsightsReady,
    MemoryUpdated,
    PatternDetected,
    // Subscription lifecycle
    SubscriptionCreated,
    SubscriptionUpgraded,
    SubscriptionCancelled,
    // Elite-tier inquiries
    EliteInquiryReceived,
    EliteInquiryUpdated,
    // Platform
    SystemAlert,
    ConnectionWelcome,
    RevenueMilestone,
    // Anything the taxonomy doesn't know yet
    Unclassified(String),
}

impl EventKind {
    /// Map a wire tag onto the taxonomy
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "proposal_submitted" => EventKind::ProposalSubmitted,
            "proposal_approved" => EventKind::ProposalApproved,
            "proposal_rejected" => EventKind::ProposalRejected,
            "proposal_under_review" => EventKind::ProposalUnderReview,
            "insights_ready" => EventKind::InsightsReady,
            "memory_updated" => EventKind::MemoryUpdated,
            "pattern_detected" => EventKind::PatternDetected,
            "subscription_created" => EventKind::SubscriptionCreated,
            "subscription_upgraded" => EventKind::SubscriptionUpgraded,
            "subscription_cancelled" => EventKind::SubscriptionCancelled,
            "elite_inquiry_received" => EventKind::EliteInquiryReceived,
            "elite_inquiry_updated" => EventKind::EliteInquiryUpdated,
            "system_alert" => EventKind::SystemAlert,
            "connected" => EventKind::ConnectionWelcome,
            "revenue_milestone" => EventKind::RevenueMilestone,
            other => EventKind::Unclassified(other.to_string()),
        }
    }

    /// The wire tag for this kind
    pub fn tag(&self) -> &str {
        match self {
            EventKind::ProposalSubmitted => "proposal_submitted",
            EventKind::ProposalApproved => "proposal_approved",
            EventKind::ProposalRejected => "proposal_rejected",
            EventKind::ProposalUnderReview => "proposal_under_review",
            EventKind::InsightsReady => "insights_ready",
            EventKind::MemoryUpdated => "memory_updated",
            EventKind::PatternDetected => "pattern_detected",
            EventKind::SubscriptionCreated => "subscription_created",
            EventKind::SubscriptionUpgraded => "subscription_upgraded",
            EventKind::SubscriptionCancelled => "subscription_cancelled",
            EventKind::EliteInquiryReceived => "elite_inquiry_received",
            EventKind::EliteInquiryUpdated => "elite_inquiry_updated",
            EventKind::SystemAlert => "system_alert",
            EventKind::ConnectionWelcome => "connected",
            EventKind::RevenueMilestone => "revenue_milestone",
            EventKind::Unclassified(tag) => tag,
        }
    }

    /// Whether this kind fell through the taxonomy
    pub fn is_unclassified(&self) -> bool {
        matches!(self, EventKind::Unclassified(_))
    }
}
