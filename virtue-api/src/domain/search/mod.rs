//! Hybrid poem search - keyword + semantic search over the poem corpus.
//!
//! The pipeline combines:
//! - **Lexical relevance** from the Meilisearch engine
//! - **Semantic similarity** via OpenAI embeddings stored as user-provided
//!   vectors, blended at a fixed 70/30 semantic/keyword ratio
//!
//! Built around trait abstractions for testability:
//!
//! - [`Embedder`] - text embedding generation (OpenAI, mocks)
//! - [`SearchIndex`] - the search engine (Meilisearch over HTTP, mocks)
//! - [`PoemSource`] - raw poem content (filesystem, mocks)
//!
//! [`SearchIndexer::rebuild`] clears and fully rebuilds the index from the
//! static poem catalog; [`SearchService::search`] answers one query with one
//! embedding call and one hybrid index query. The two never interact beyond
//! sharing the index.

mod corpus;
mod indexer;
mod service;
mod traits;
mod types;

pub mod embedder;
pub mod index;

pub use corpus::{catalog, languages, FsPoemSource};
pub use indexer::{IndexerConfig, SearchIndexer};
pub use service::{SearchConfig, SearchService};
pub use traits::{Embedder, PoemSource, Result, SearchError, SearchIndex};
pub use types::{HybridQuery, IndexFilter, IndexingOutcome, PoemDocument, SearchHit};
