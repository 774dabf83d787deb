use axum::{extract::FromRequestParts, http::request::Parts};

use super::ApiError;

/// The authenticated caller, as asserted by the fronting proxy.
///
/// Authentication itself happens upstream; this API trusts the `X-User-Id`
/// and `X-User-Role` headers the proxy injects after verifying the session.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Missing user identity"))?
            .to_string();

        let is_admin = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|role| role.eq_ignore_ascii_case("admin"));

        Ok(Self { user_id, is_admin })
    }
}
