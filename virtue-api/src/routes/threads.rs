use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::moderation::GateLimits,
    repositories::{NewThread, Thread, ThreadRepository},
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_thread).get(list_threads))
        .route("/:thread_id", get(get_thread))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateThreadBody {
    stanza_path: String,
    title: String,
    content: String,
}

#[instrument(name = "POST /threads", skip(app_state, body))]
async fn create_thread(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateThreadBody>,
) -> Result<Json<Thread>, ApiError> {
    let title = body.title.trim();
    let content = body.content.trim();
    let stanza_path = body.stanza_path.trim();
    if title.is_empty() || content.is_empty() || stanza_path.is_empty() {
        return Err(ApiError::bad_request(
            "stanzaPath, title and content are required",
        ));
    }

    app_state
        .gate
        .review(&actor.user_id, GateLimits::THREADS, Some(title), content)
        .await?;

    let thread = app_state
        .thread_repo
        .create(NewThread {
            stanza_path: stanza_path.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author_id: actor.user_id,
        })
        .await?;

    Ok(Json(thread))
}

#[derive(Debug, Deserialize)]
struct ListThreadsQuery {
    stanza: String,
}

#[instrument(name = "GET /threads", skip(app_state))]
async fn list_threads(
    State(app_state): State<AppState>,
    Query(query): Query<ListThreadsQuery>,
) -> Result<Json<Vec<Thread>>, ApiError> {
    let threads = app_state.thread_repo.list_by_stanza(&query.stanza).await?;
    Ok(Json(threads))
}

#[instrument(name = "GET /threads/:id", skip(app_state))]
async fn get_thread(
    State(app_state): State<AppState>,
    Path(thread_id): Path<i64>,
) -> Result<Json<Thread>, ApiError> {
    let thread = app_state.thread_repo.get(thread_id).await?;
    Ok(Json(thread))
}
