//! Subject binding
//!
//! Every notification stream is scoped to one subject: a creator or an
//! admin actor. The binding is fixed for the lifetime of a provider;
//! switching identity means tearing the provider down and creating a new
//! one.

use crate::error::{NotifyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of identity a notification stream belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Creator,
    Admin,
}

impl SubjectKind {
    /// Wire representation used in the channel path
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Creator => "creator",
            SubjectKind::Admin => "admin",
        }
    }

    /// Parse the wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "creator" => Some(SubjectKind::Creator),
            "admin" => Some(SubjectKind::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity a notification stream is scoped to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub kind: SubjectKind,
    pub id: String,
}

impl Subject {
    pub fn new(kind: SubjectKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// A subject with an empty id cannot open a channel
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Derive the realtime channel URL for a subject from the service's HTTP
/// origin.
///
/// The scheme is substituted (`https` → `wss`, `http` → `ws`), host and
/// port are reused, and the subject is appended to the channel path:
/// `wss://<host>/ws/notifications/<kind>/<id>`.
pub fn channel_url(origin: &str, subject: &Subject) -> Result<String> {
    if !subject.is_valid() {
        return Err(NotifyError::InvalidSubject(subject.to_string()));
    }

    let origin = origin.trim_end_matches('/');
    let realtime_origin = if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(NotifyError::InvalidOrigin(origin.to_string()));
    };

    Ok(format!(
        "{}/ws/notifications/{}/{}",
        realtime_origin, subject.kind, subject.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_origin_maps_to_secure_scheme() {
        let subject = Subject::new(SubjectKind::Creator, "c42");
        let url = channel_url("https://api.creatorhub.io", &subject).unwrap();
        assert_eq!(url, "wss://api.creatorhub.io/ws/notifications/creator/c42");
    }

    #[test]
    fn test_plain_origin_maps_to_plain_scheme() {
        let subject = Subject::new(SubjectKind::Admin, "ops-1");
        let url = channel_url("http://localhost:8080", &subject).unwrap();
        assert_eq!(url, "ws://localhost:8080/ws/notifications/admin/ops-1");
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let subject = Subject::new(SubjectKind::Creator, "c1");
        let url = channel_url("https://api.creatorhub.io/", &subject).unwrap();
        assert_eq!(url, "wss://api.creatorhub.io/ws/notifications/creator/c1");
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let subject = Subject::new(SubjectKind::Creator, "c1");
        assert!(channel_url("ftp://api.creatorhub.io", &subject).is_err());
    }

    #[test]
    fn test_empty_subject_id_is_rejected() {
        let subject = Subject::new(SubjectKind::Creator, "  ");
        assert!(!subject.is_valid());
        assert!(channel_url("https://api.creatorhub.io", &subject).is_err());
    }

    #[test]
    fn test_subject_kind_roundtrip() {
        assert_eq!(SubjectKind::parse("creator"), Some(SubjectKind::Creator));
        assert_eq!(SubjectKind::parse("admin"), Some(SubjectKind::Admin));
        assert_eq!(SubjectKind::parse("viewer"), None);
        assert_eq!(SubjectKind::Creator.as_str(), "creator");
    }
}
