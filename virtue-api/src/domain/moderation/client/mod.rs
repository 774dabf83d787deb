//! Clients for the external moderation service.

mod mock;
mod openai;

use async_trait::async_trait;

pub use mock::MockModerationClient;
pub use openai::OpenAiModerationClient;

/// Error from a moderation service call.
///
/// Never escapes [`super::ContentModerator`]: any client failure is logged
/// and converted into a fail-open verdict.
#[derive(Debug, thiserror::Error)]
pub enum ModerationClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Category classification of a piece of text.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub flagged: bool,
    /// Names of the categories that were flagged.
    pub flagged_categories: Vec<String>,
    /// Highest per-category score, in 0.0..=1.0.
    pub max_category_score: f64,
}

/// External classification and chat-completion endpoints, abstracted for
/// testing without network access.
#[async_trait]
pub trait ModerationClient: Send + Sync {
    /// Run the text through the provider's moderation classifier.
    async fn classify(&self, text: &str) -> Result<Classification, ModerationClientError>;

    /// Single-turn chat completion used for the contextual check.
    async fn chat_complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ModerationClientError>;
}
