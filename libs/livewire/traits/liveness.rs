//! Liveness Response Detection
//!
//! The platform's realtime channels answer an application-level liveness
//! probe with a fixed response token sent as a regular data frame. This
//! trait identifies those frames so the session can record them and swallow
//! them before they ever reach the router.

use crate::frame::Frame;

/// Trait for detecting liveness responses in the inbound frame stream.
///
/// A frame for which `is_probe_response` returns true is consumed by the
/// session's liveness tracking and is never parsed or routed.
pub trait LivenessDetector: Send + Sync {
    /// Check whether the given frame is the peer's liveness response.
    fn is_probe_response(&self, frame: &Frame) -> bool;
}

/// Text-based liveness detector.
///
/// Matches frames whose literal content equals the configured response token.
pub struct TextLivenessDetector {
    response_token: String,
}

impl TextLivenessDetector {
    /// Create a detector for the given response token.
    ///
    /// # Arguments
    /// * `response_token` - The exact text the peer echoes to a probe
    pub fn new(response_token: impl Into<String>) -> Self {
        Self {
            response_token: response_token.into(),
        }
    }
}

impl LivenessDetector for TextLivenessDetector {
    fn is_probe_response(&self, frame: &Frame) -> bool {
        if let Frame::Text(text) = frame {
            text == &self.response_token
        } else {
            false
        }
    }
}

/// No-op detector that never matches.
///
/// Use this when the channel has no application-level liveness protocol.
pub struct NoopLivenessDetector;

impl LivenessDetector for NoopLivenessDetector {
    fn is_probe_response(&self, _frame: &Frame) -> bool {
        false
    }
}
