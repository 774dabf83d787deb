use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::{
    domain::moderation::GateRejection, domain::search::SearchError,
    repositories::RepositoryError,
};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                Self::internal(err.to_string())
            }
            RepositoryError::NotFound(_) => Self::not_found(err.to_string()),
        }
    }
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::RateLimited => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, rejection.to_string())
            }
            GateRejection::Spam(_) | GateRejection::Inappropriate(_) => {
                Self::bad_request(rejection.to_string())
            }
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::EmptyQuery => Self::bad_request(err.to_string()),
            SearchError::Embedding(ref e) => {
                tracing::error!("Embedding error: {}", e);
                Self::internal("search is temporarily unavailable")
            }
            SearchError::Index(ref e) => {
                tracing::error!("Search index error: {}", e);
                Self::internal("search is temporarily unavailable")
            }
            SearchError::Source(ref e) => {
                tracing::error!("Content source error: {}", e);
                Self::internal(err.to_string())
            }
        }
    }
}
