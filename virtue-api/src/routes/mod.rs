pub(crate) mod actor;
pub(crate) mod book_requests;
pub(crate) mod churches;
pub(crate) mod comments;
pub(crate) mod error;
pub(crate) mod poverty_data;
pub(crate) mod search;
pub(crate) mod threads;
pub(crate) mod votes;

pub(crate) use actor::Actor;
pub(crate) use error::ApiError;
