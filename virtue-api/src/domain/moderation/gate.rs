//! Composition of the three moderation checks into one submission gate.

use std::time::Duration;

use super::moderator::ContentModerator;
use super::rate_limiter::RateLimiter;
use super::spam::SpamDetector;

/// Per-route rate-limit parameters.
#[derive(Debug, Clone, Copy)]
pub struct GateLimits {
    pub window: Duration,
    pub max_events: usize,
}

impl GateLimits {
    /// New threads: 3 per minute per user.
    pub const THREADS: Self = Self {
        window: Duration::from_secs(60),
        max_events: 3,
    };

    /// Comments: 10 per minute per user.
    pub const COMMENTS: Self = Self {
        window: Duration::from_secs(60),
        max_events: 10,
    };
}

/// Why a submission was rejected. These are expected, user-facing outcomes;
/// the reason string is surfaced to the end user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("Rate limit exceeded. Please wait before posting again.")]
    RateLimited,

    #[error("Content rejected: {0}")]
    Spam(String),

    #[error("Content not appropriate: {0}")]
    Inappropriate(String),
}

/// The gate every thread and comment passes before persistence:
/// rate limit, then spam heuristics, then content moderation. The first
/// failing check wins.
pub struct SubmissionGate {
    rate_limiter: RateLimiter,
    spam: SpamDetector,
    moderator: ContentModerator,
}

impl SubmissionGate {
    pub fn new(moderator: ContentModerator) -> Self {
        Self {
            rate_limiter: RateLimiter::new(),
            spam: SpamDetector::new(),
            moderator,
        }
    }

    /// Review a submission for `actor_id`.
    ///
    /// When a title is present the spam heuristics see `title body` and the
    /// moderator sees the title and body as separate paragraphs.
    pub async fn review(
        &self,
        actor_id: &str,
        limits: GateLimits,
        title: Option<&str>,
        body: &str,
    ) -> Result<(), GateRejection> {
        if !self
            .rate_limiter
            .allow(actor_id, limits.window, limits.max_events)
        {
            return Err(GateRejection::RateLimited);
        }

        let spam_text = match title {
            Some(title) => format!("{title} {body}"),
            None => body.to_string(),
        };
        let verdict = self.spam.classify(&spam_text);
        if verdict.is_spam {
            let reason = verdict.reason.unwrap_or("Spam detected");
            return Err(GateRejection::Spam(reason.to_string()));
        }

        let moderation_text = match title {
            Some(title) => format!("{title}\n\n{body}"),
            None => body.to_string(),
        };
        let verdict = self.moderator.moderate(&moderation_text).await;
        if !verdict.is_appropriate {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "Content not suitable for this platform".to_string());
            return Err(GateRejection::Inappropriate(reason));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::client::MockModerationClient;
    use std::sync::Arc;

    fn gate() -> SubmissionGate {
        SubmissionGate::new(ContentModerator::disabled())
    }

    #[tokio::test]
    async fn clean_submission_passes() {
        let gate = gate();
        let result = gate
            .review("user-1", GateLimits::COMMENTS, None, "A thoughtful reply.")
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn rate_limit_fires_before_spam_check() {
        let gate = gate();
        let limits = GateLimits {
            window: Duration::from_secs(60),
            max_events: 1,
        };

        assert!(gate.review("user-1", limits, None, "first").await.is_ok());

        // Even blatant spam reports the rate limit once the window is full.
        let err = gate
            .review("user-1", limits, None, "buy now buy now")
            .await
            .unwrap_err();
        assert_eq!(err, GateRejection::RateLimited);
    }

    #[tokio::test]
    async fn spam_is_rejected_with_reason() {
        let gate = gate();
        let err = gate
            .review("user-1", GateLimits::COMMENTS, None, "free money for all of you")
            .await
            .unwrap_err();
        assert_eq!(err, GateRejection::Spam("Contains spam keywords".into()));
        assert_eq!(err.to_string(), "Content rejected: Contains spam keywords");
    }

    #[tokio::test]
    async fn title_is_included_in_spam_text() {
        let gate = gate();
        let err = gate
            .review(
                "user-1",
                GateLimits::THREADS,
                Some("Congratulations you won"),
                "please read this thread",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GateRejection::Spam(_)));
    }

    #[tokio::test]
    async fn moderation_rejection_is_surfaced() {
        let client = MockModerationClient::approving().with_chat_reply("INAPPROPRIATE: Harassment");
        let gate = SubmissionGate::new(ContentModerator::new(Arc::new(client)));

        let err = gate
            .review("user-1", GateLimits::COMMENTS, None, "some text")
            .await
            .unwrap_err();
        assert_eq!(err, GateRejection::Inappropriate("Harassment".into()));
    }
}
