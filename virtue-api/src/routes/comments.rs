use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::moderation::GateLimits,
    repositories::{Comment, CommentRepository, NewComment, RepositoryError, ThreadRepository},
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/:thread_id/comments",
        post(create_comment).get(list_comments),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentBody {
    content: String,
    parent_id: Option<i64>,
}

#[instrument(name = "POST /threads/:id/comments", skip(app_state, body))]
async fn create_comment(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(thread_id): Path<i64>,
    Json(body): Json<CreateCommentBody>,
) -> Result<Json<Comment>, ApiError> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::bad_request("content is required"));
    }

    let thread = app_state.thread_repo.get(thread_id).await?;
    if thread.is_locked && !actor.is_admin {
        return Err(ApiError::forbidden("Thread is locked"));
    }

    // A reply must target a comment in the same thread.
    if let Some(parent_id) = body.parent_id {
        let parent = match app_state.comment_repo.get(parent_id).await {
            Ok(parent) => parent,
            Err(RepositoryError::NotFound(_)) => {
                return Err(ApiError::bad_request(
                    "Parent comment not found in this thread",
                ))
            }
            Err(err) => return Err(err.into()),
        };
        if parent.thread_id != thread_id {
            return Err(ApiError::bad_request(
                "Parent comment not found in this thread",
            ));
        }
    }

    app_state
        .gate
        .review(&actor.user_id, GateLimits::COMMENTS, None, content)
        .await?;

    let comment = app_state
        .comment_repo
        .create(NewComment {
            thread_id,
            parent_id: body.parent_id,
            content: content.to_string(),
            author_id: actor.user_id,
        })
        .await?;

    Ok(Json(comment))
}

#[instrument(name = "GET /threads/:id/comments", skip(app_state))]
async fn list_comments(
    State(app_state): State<AppState>,
    Path(thread_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    // 404 for unknown threads rather than an empty list.
    app_state.thread_repo.get(thread_id).await?;
    let comments = app_state.comment_repo.list_by_thread(thread_id).await?;
    Ok(Json(comments))
}
