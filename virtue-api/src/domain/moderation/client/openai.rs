//! OpenAI-backed moderation client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Classification, ModerationClient, ModerationClientError};

const API_BASE: &str = "https://api.openai.com/v1";

/// Moderation client backed by OpenAI's `/moderations` and
/// `/chat/completions` endpoints.
#[derive(Clone)]
pub struct OpenAiModerationClient {
    http: reqwest::Client,
    api_key: String,
    chat_model: String,
    base_url: String,
}

impl OpenAiModerationClient {
    /// The contextual check must not hang a submission indefinitely; a slow
    /// moderation call degrades into the fail-open path instead.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(api_key: impl Into<String>, chat_model: impl Into<String>) -> Self {
        Self::with_timeout(api_key, chat_model, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        chat_model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client");

        Self {
            http,
            api_key: api_key.into(),
            chat_model: chat_model.into(),
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Deserialize)]
struct ModerationsResponse {
    results: Vec<ModerationOutcome>,
}

#[derive(Deserialize)]
struct ModerationOutcome {
    flagged: bool,
    categories: HashMap<String, bool>,
    category_scores: HashMap<String, f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ModerationClient for OpenAiModerationClient {
    async fn classify(&self, text: &str) -> Result<Classification, ModerationClientError> {
        let response = self
            .http
            .post(format!("{}/moderations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "input": text }))
            .send()
            .await
            .map_err(|e| ModerationClientError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| ModerationClientError::Request(e.to_string()))?;

        let body: ModerationsResponse = response
            .json()
            .await
            .map_err(|e| ModerationClientError::MalformedResponse(e.to_string()))?;

        let outcome = body.results.into_iter().next().ok_or_else(|| {
            ModerationClientError::MalformedResponse("empty results array".into())
        })?;

        let mut flagged_categories: Vec<String> = outcome
            .categories
            .into_iter()
            .filter(|(_, flagged)| *flagged)
            .map(|(category, _)| category)
            .collect();
        flagged_categories.sort();

        let max_category_score = outcome
            .category_scores
            .values()
            .copied()
            .fold(0.0f64, f64::max);

        Ok(Classification {
            flagged: outcome.flagged,
            flagged_categories,
            max_category_score,
        })
    }

    async fn chat_complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ModerationClientError> {
        let messages = [
            ChatMessage {
                role: "system",
                content: system_prompt,
            },
            ChatMessage {
                role: "user",
                content: user_text,
            },
        ];

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.chat_model,
                "messages": messages,
                "max_tokens": 100,
                "temperature": 0.1,
            }))
            .send()
            .await
            .map_err(|e| ModerationClientError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| ModerationClientError::Request(e.to_string()))?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModerationClientError::MalformedResponse(e.to_string()))?;

        let reply = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(reply.trim().to_string())
    }
}
