//! Verdict types produced by the moderation checks.

use serde::Serialize;

/// Outcome of the two-stage content moderation pipeline.
///
/// Consumed immediately by the caller to accept or reject a submission,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationVerdict {
    pub is_appropriate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 0-100. Zero means the check did not actually run (fail-open).
    pub confidence: f64,
}

impl ModerationVerdict {
    /// Verdict used whenever moderation cannot run: disabled configuration,
    /// missing credentials or a remote failure. Content passes.
    pub fn fail_open() -> Self {
        Self {
            is_appropriate: true,
            reason: None,
            confidence: 0.0,
        }
    }

    pub fn appropriate(confidence: f64) -> Self {
        Self {
            is_appropriate: true,
            reason: None,
            confidence,
        }
    }

    pub fn inappropriate(reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            is_appropriate: false,
            reason: Some(reason.into()),
            confidence,
        }
    }
}

/// Outcome of the heuristic spam check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpamVerdict {
    pub is_spam: bool,
    pub reason: Option<&'static str>,
}

impl SpamVerdict {
    pub fn clean() -> Self {
        Self {
            is_spam: false,
            reason: None,
        }
    }

    pub fn spam(reason: &'static str) -> Self {
        Self {
            is_spam: true,
            reason: Some(reason),
        }
    }
}
