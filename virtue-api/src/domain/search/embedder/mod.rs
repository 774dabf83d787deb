//! Embedder implementations.

mod mock;
mod openai;

pub use mock::MockEmbedder;
pub use openai::{OpenAiEmbedder, OPENAI_EMBEDDING_DIMENSIONS, OPENAI_EMBEDDING_MODEL};
