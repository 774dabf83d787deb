use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::search,
    repositories::{BookRequest, BookRequestRepository, NewBookRequest},
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_request).get(list_requests))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequestBody {
    requester_name: String,
    address: String,
    language: String,
}

#[instrument(name = "POST /book-requests", skip(app_state, body))]
async fn create_request(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateRequestBody>,
) -> Result<Json<BookRequest>, ApiError> {
    let requester_name = body.requester_name.trim();
    let address = body.address.trim();
    if requester_name.is_empty() || address.is_empty() {
        return Err(ApiError::bad_request(
            "requesterName and address are required",
        ));
    }
    if !search::languages().contains(&body.language.as_str()) {
        return Err(ApiError::bad_request(format!(
            "unsupported language '{}'",
            body.language
        )));
    }

    let request = app_state
        .book_request_repo
        .create(NewBookRequest {
            user_id: actor.user_id,
            requester_name: requester_name.to_string(),
            address: address.to_string(),
            language: body.language,
        })
        .await?;

    Ok(Json(request))
}

#[instrument(name = "GET /book-requests", skip(app_state))]
async fn list_requests(
    State(app_state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<BookRequest>>, ApiError> {
    if !actor.is_admin {
        return Err(ApiError::forbidden("Admin access required"));
    }
    let requests = app_state.book_request_repo.list().await?;
    Ok(Json(requests))
}
