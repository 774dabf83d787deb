use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    repositories::{NewVote, Vote, VoteRepository},
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(cast_vote))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CastVoteBody {
    target_type: String,
    target_id: i64,
    value: i16,
}

#[instrument(name = "POST /votes", skip(app_state))]
async fn cast_vote(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(body): Json<CastVoteBody>,
) -> Result<Json<Vote>, ApiError> {
    if body.target_type != "thread" && body.target_type != "comment" {
        return Err(ApiError::bad_request(
            "targetType must be 'thread' or 'comment'",
        ));
    }
    if body.value != 1 && body.value != -1 {
        return Err(ApiError::bad_request("value must be 1 or -1"));
    }

    let vote = app_state
        .vote_repo
        .upsert(NewVote {
            user_id: actor.user_id,
            target_type: body.target_type,
            target_id: body.target_id,
            value: body.value,
        })
        .await?;

    Ok(Json(vote))
}
