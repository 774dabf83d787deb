//! Search index implementations.

mod meili;
mod mock;

pub use meili::MeiliIndex;
pub use mock::MockSearchIndex;
