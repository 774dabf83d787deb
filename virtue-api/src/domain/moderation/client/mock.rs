//! Mock moderation client for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{Classification, ModerationClient, ModerationClientError};

/// Configurable mock for [`ModerationClient`] with call counting.
#[derive(Clone, Default)]
pub struct MockModerationClient {
    classification: Arc<RwLock<Option<Classification>>>,
    chat_reply: Arc<RwLock<Option<String>>>,
    fail: Arc<RwLock<bool>>,
    classify_calls: Arc<AtomicUsize>,
    chat_calls: Arc<AtomicUsize>,
}

impl MockModerationClient {
    /// Client that reports nothing flagged and approves the contextual check.
    pub fn approving() -> Self {
        Self::default()
    }

    /// Client whose classifier flags the given categories.
    pub fn flagging(categories: &[&str], max_score: f64) -> Self {
        let mock = Self::default();
        *mock.classification.write().unwrap() = Some(Classification {
            flagged: true,
            flagged_categories: categories.iter().map(|c| c.to_string()).collect(),
            max_category_score: max_score,
        });
        mock
    }

    /// Client whose contextual check replies with the given text.
    pub fn with_chat_reply(self, reply: impl Into<String>) -> Self {
        *self.chat_reply.write().unwrap() = Some(reply.into());
        self
    }

    /// Client where every call errors, for exercising the fail-open path.
    pub fn failing() -> Self {
        let mock = Self::default();
        *mock.fail.write().unwrap() = true;
        mock
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationClient for MockModerationClient {
    async fn classify(&self, _text: &str) -> Result<Classification, ModerationClientError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.read().unwrap() {
            return Err(ModerationClientError::Request("mock failure".into()));
        }
        Ok(self
            .classification
            .read()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }

    async fn chat_complete(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> Result<String, ModerationClientError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.read().unwrap() {
            return Err(ModerationClientError::Request("mock failure".into()));
        }
        Ok(self
            .chat_reply
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "APPROPRIATE".to_string()))
    }
}
