//! Two-stage content moderation against an external classification service.

use std::sync::Arc;

use tracing::warn;

use super::client::ModerationClient;
use super::types::ModerationVerdict;

/// System instruction for the contextual check. Expects a strict
/// `APPROPRIATE` / `INAPPROPRIATE: [reason]` reply.
const CONTEXT_PROMPT: &str = r#"You are a content moderator for a Christian poetry discussion platform called "Our Virtue".

The platform features religious poetry about virtues, faith, and spiritual guidance. Users discuss the meaning and application of these poems.

Your job is to determine if user-generated content is appropriate for this context.

APPROVE content that:
- Discusses faith, spirituality, and religious topics respectfully
- Shares personal experiences related to faith
- Asks genuine questions about religious concepts
- Offers encouragement and support
- Engages thoughtfully with the poetry's themes

FLAG content that:
- Contains hate speech or attacks on any religious group
- Is spam or promotional
- Contains explicit sexual content
- Promotes violence or illegal activities
- Is completely off-topic from spiritual/religious discussion
- Contains personal attacks or harassment

Respond with only "APPROPRIATE" or "INAPPROPRIATE: [reason]""#;

const REJECT_MARKER: &str = "INAPPROPRIATE:";
const DEFAULT_REJECT_REASON: &str = "Content not suitable for this platform";

/// Moderates submissions in two stages: the provider's category classifier
/// first, then a contextual language-model check scoped to the platform's
/// accepted topics.
///
/// Construct with [`ContentModerator::disabled`] when no moderation service
/// is configured; every call then returns the fail-open verdict. Remote
/// failures also fail open and are logged, never surfaced to the caller.
#[derive(Clone)]
pub struct ContentModerator {
    client: Option<Arc<dyn ModerationClient>>,
}

impl ContentModerator {
    pub fn new(client: Arc<dyn ModerationClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Moderation explicitly turned off; all content passes with confidence 0.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub async fn moderate(&self, text: &str) -> ModerationVerdict {
        let Some(client) = &self.client else {
            return ModerationVerdict::fail_open();
        };

        // Stage 1: provider classification.
        match client.classify(text).await {
            Ok(classification) if classification.flagged => {
                return ModerationVerdict::inappropriate(
                    format!(
                        "Content flagged for: {}",
                        classification.flagged_categories.join(", ")
                    ),
                    classification.max_category_score * 100.0,
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Moderation classification failed, allowing content");
                return ModerationVerdict::fail_open();
            }
        }

        // Stage 2: contextual check.
        match client.chat_complete(CONTEXT_PROMPT, text).await {
            Ok(reply) => {
                if let Some(rest) = reply.strip_prefix(REJECT_MARKER) {
                    let reason = rest.trim();
                    let reason = if reason.is_empty() {
                        DEFAULT_REJECT_REASON
                    } else {
                        reason
                    };
                    ModerationVerdict::inappropriate(reason, 85.0)
                } else {
                    ModerationVerdict::appropriate(95.0)
                }
            }
            Err(e) => {
                warn!(error = %e, "Contextual moderation failed, allowing content");
                ModerationVerdict::fail_open()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::client::MockModerationClient;

    #[tokio::test]
    async fn disabled_moderator_allows_everything() {
        let moderator = ContentModerator::disabled();

        // Deliberately offensive input still passes when no service is
        // configured; fail-open is the documented policy.
        let verdict = moderator.moderate("I hate all of you, burn everything").await;
        assert!(verdict.is_appropriate);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.reason, None);
    }

    #[tokio::test]
    async fn flagged_classification_rejects_with_categories() {
        let client = MockModerationClient::flagging(&["harassment", "hate"], 0.92);
        let moderator = ContentModerator::new(Arc::new(client.clone()));

        let verdict = moderator.moderate("some text").await;
        assert!(!verdict.is_appropriate);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Content flagged for: harassment, hate")
        );
        assert!((verdict.confidence - 92.0).abs() < 1e-9);
        // Stage 2 is skipped once stage 1 rejects.
        assert_eq!(client.chat_calls(), 0);
    }

    #[tokio::test]
    async fn clean_content_passes_both_stages() {
        let client = MockModerationClient::approving();
        let moderator = ContentModerator::new(Arc::new(client.clone()));

        let verdict = moderator.moderate("This poem gave me hope today.").await;
        assert!(verdict.is_appropriate);
        assert_eq!(verdict.confidence, 95.0);
        assert_eq!(client.classify_calls(), 1);
        assert_eq!(client.chat_calls(), 1);
    }

    #[tokio::test]
    async fn contextual_rejection_is_parsed() {
        let client = MockModerationClient::approving()
            .with_chat_reply("INAPPROPRIATE: Off-topic promotional content");
        let moderator = ContentModerator::new(Arc::new(client));

        let verdict = moderator.moderate("some text").await;
        assert!(!verdict.is_appropriate);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Off-topic promotional content")
        );
        assert_eq!(verdict.confidence, 85.0);
    }

    #[tokio::test]
    async fn empty_rejection_reason_falls_back_to_generic() {
        let client = MockModerationClient::approving().with_chat_reply("INAPPROPRIATE:");
        let moderator = ContentModerator::new(Arc::new(client));

        let verdict = moderator.moderate("some text").await;
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.reason.as_deref(), Some(DEFAULT_REJECT_REASON));
    }

    #[tokio::test]
    async fn unexpected_chat_reply_is_treated_as_approval() {
        let client =
            MockModerationClient::approving().with_chat_reply("I think this is probably fine?");
        let moderator = ContentModerator::new(Arc::new(client));

        let verdict = moderator.moderate("some text").await;
        assert!(verdict.is_appropriate);
    }

    #[tokio::test]
    async fn service_failure_fails_open() {
        let client = MockModerationClient::failing();
        let moderator = ContentModerator::new(Arc::new(client));

        let verdict = moderator.moderate("anything at all").await;
        assert!(verdict.is_appropriate);
        assert_eq!(verdict.confidence, 0.0);
    }
}
