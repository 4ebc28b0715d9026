//! Notification store
//!
//! The single source of truth for the notification panel: an ordered,
//! bounded, newest-first collection plus a derived unread counter. Every
//! mutation keeps `unread_count` equal to the number of entries with
//! `read == false`. No store method performs I/O; acknowledgments are an
//! explicit, separate provider call.

use crate::notification::Notification;
use tracing::trace;

/// Default retention ceiling: entries beyond this are evicted oldest-first
pub const DEFAULT_RETENTION: usize = 50;

/// Ordered, bounded collection of notifications with read/unread state
#[derive(Debug)]
pub struct NotificationStore {
    /// Newest first
    entries: Vec<Notification>,
    unread: usize,
    retention: usize,
}

impl NotificationStore {
    /// Create a store with the default retention ceiling
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// Create a store with a custom retention ceiling
    pub fn with_retention(retention: usize) -> Self {
        Self {
            entries: Vec::new(),
            unread: 0,
            retention: retention.max(1),
        }
    }

    /// Prepend a notification, evicting the oldest entries past the
    /// retention ceiling
    pub fn append(&mut self, notification: Notification) {
        let was_unread = !notification.read;
        self.entries.insert(0, notification);

        while self.entries.len() > self.retention {
            // Oldest entry is at the tail; eviction is silent
            if let Some(evicted) = self.entries.pop() {
                if !evicted.read {
                    self.unread = self.unread.saturating_sub(1);
                }
                trace!(id = %evicted.id, "Evicted notification past retention ceiling");
            }
        }

        if was_unread {
            self.unread += 1;
        }
    }

    /// Mark one notification read; absent ids are a no-op
    pub fn mark_read(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|n| n.id == id) {
            if !entry.read {
                entry.read = true;
                self.unread = self.unread.saturating_sub(1);
            }
        }
    }

    /// Mark every notification read
    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
        self.unread = 0;
    }

    /// Empty the store
    pub fn clear(&mut self) {
        self.entries.clear();
        self.unread = 0;
    }

    /// Dismiss one notification; absent ids are a no-op
    ///
    /// The unread counter only changes if the removed entry was unread.
    pub fn remove(&mut self, id: &str) -> Option<Notification> {
        let idx = self.entries.iter().position(|n| n.id == id)?;
        let removed = self.entries.remove(idx);
        if !removed.read {
            self.unread = self.unread.saturating_sub(1);
        }
        Some(removed)
    }

    /// Newest-first view of the stored notifications
    pub fn notifications(&self) -> &[Notification] {
        &self.entries
    }

    /// Owned newest-first snapshot for consumers
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.clone()
    }

    /// Number of entries with `read == false`
    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
