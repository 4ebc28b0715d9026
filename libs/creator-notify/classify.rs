//! Notification classification
//!
//! Maps an event kind onto its display presentation: icon, title, and
//! semantic severity. The table is exhaustive over [`EventKind`]; the
//! `Unclassified` arm is the generic fallback, so classification never
//! fails and never drops an event.

use crate::event::EventKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Semantic severity of a notification
///
/// Severity selects the transient display channel: success and info use a
/// short-lived toast, warnings stay longer, errors longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// How long the transient display for this severity stays visible
    ///
    /// Presentation configuration only; not part of the store's durable
    /// state.
    pub fn display_duration(&self) -> Duration {
        match self {
            Severity::Info => Duration::from_secs(4),
            Severity::Success => Duration::from_secs(5),
            Severity::Warning => Duration::from_secs(7),
            Severity::Error => Duration::from_secs(10),
        }
    }
}

/// Display presentation derived from an event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub icon: &'static str,
    pub title: &'static str,
    pub severity: Severity,
}

/// Classify an event kind into its presentation
pub fn classify(kind: &EventKind) -> Presentation {
    use EventKind::*;
    use Severity::*;

    let (icon, title, severity) = match kind {
        ProposalSubmitted => ("📋", "Proposal Submitted", Info),
        ProposalApproved => ("✅", "Proposal Approved", Success),
        ProposalRejected => ("❌", "Proposal Rejected", Error),
        ProposalUnderReview => ("👀", "Proposal Under Review", Info),
        InsightsReady => ("✨", "AI Insights Ready", Info),
        MemoryUpdated => ("🧠", "Memory Updated", Info),
        PatternDetected => ("📈", "Pattern Detected", Info),
        SubscriptionCreated => ("🎉", "New Subscriber", Success),
        SubscriptionUpgraded => ("⬆️", "Subscription Upgraded", Success),
        SubscriptionCancelled => ("💔", "Subscription Cancelled", Warning),
        EliteInquiryReceived => ("💎", "New Elite Inquiry", Info),
        EliteInquiryUpdated => ("💎", "Elite Inquiry Updated", Info),
        SystemAlert => ("⚠️", "System Alert", Warning),
        ConnectionWelcome => ("🔌", "Connected", Info),
        RevenueMilestone => ("💰", "Revenue Milestone", Success),
        Unclassified(_) => ("🔔", "Notification", Info),
    };

    Presentation {
        icon,
        title,
        severity,
    }
}
