use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::{
    config::Settings,
    domain::moderation::{client::OpenAiModerationClient, ContentModerator, SubmissionGate},
    domain::search::{
        embedder::OpenAiEmbedder, index::MeiliIndex, FsPoemSource, SearchConfig, SearchIndexer,
        SearchService,
    },
    repositories::{
        BookRequestRepositoryImpl, ChurchRepositoryImpl, CommentRepositoryImpl,
        PovertyDataRepositoryImpl, ThreadRepositoryImpl, VoteRepositoryImpl,
    },
};

/// Everything the search endpoints need, built only when search is enabled
/// and an OpenAI key is present.
pub struct SearchState {
    pub service: SearchService<OpenAiEmbedder, MeiliIndex>,
    pub indexer: SearchIndexer<OpenAiEmbedder, MeiliIndex, FsPoemSource>,
    /// Held for the duration of a rebuild so concurrent rebuilds fail fast.
    pub rebuild_lock: Mutex<()>,
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub thread_repo: Arc<ThreadRepositoryImpl>,
    pub comment_repo: Arc<CommentRepositoryImpl>,
    pub vote_repo: Arc<VoteRepositoryImpl>,
    pub church_repo: Arc<ChurchRepositoryImpl>,
    pub book_request_repo: Arc<BookRequestRepositoryImpl>,
    pub poverty_data_repo: Arc<PovertyDataRepositoryImpl>,
    pub gate: Arc<SubmissionGate>,
    pub search: Option<Arc<SearchState>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Settings) -> Self {
        let moderator = match (
            config.moderation.enabled,
            config.moderation.openai_api_key.as_deref(),
        ) {
            (true, Some(api_key)) => ContentModerator::new(Arc::new(
                OpenAiModerationClient::new(api_key, config.moderation.chat_model.clone()),
            )),
            (true, None) => {
                tracing::warn!("Moderation enabled but no OpenAI API key configured; all content will pass");
                ContentModerator::disabled()
            }
            (false, _) => ContentModerator::disabled(),
        };

        let search = match (config.search.enabled, config.search.openai_api_key.as_deref()) {
            (true, Some(api_key)) => {
                let embedder = OpenAiEmbedder::new(api_key);
                let index = MeiliIndex::new(
                    config.search.meilisearch_host.clone(),
                    config.search.meilisearch_api_key.clone(),
                );
                let source = FsPoemSource::new(config.search.content_dir.clone());
                Some(Arc::new(SearchState {
                    service: SearchService::new(
                        embedder.clone(),
                        index.clone(),
                        SearchConfig::default(),
                    ),
                    indexer: SearchIndexer::with_defaults(embedder, index, source),
                    rebuild_lock: Mutex::new(()),
                }))
            }
            (true, None) => {
                tracing::warn!("Search enabled but no OpenAI API key configured; search routes will be unavailable");
                None
            }
            (false, _) => None,
        };

        Self {
            thread_repo: Arc::new(ThreadRepositoryImpl::new(db_pool.clone())),
            comment_repo: Arc::new(CommentRepositoryImpl::new(db_pool.clone())),
            vote_repo: Arc::new(VoteRepositoryImpl::new(db_pool.clone())),
            church_repo: Arc::new(ChurchRepositoryImpl::new(db_pool.clone())),
            book_request_repo: Arc::new(BookRequestRepositoryImpl::new(db_pool.clone())),
            poverty_data_repo: Arc::new(PovertyDataRepositoryImpl::new(db_pool.clone())),
            gate: Arc::new(SubmissionGate::new(moderator)),
            search,
            admin_token: config.application.admin_token.clone(),
            db_pool,
        }
    }
}
