use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    repositories::{Church, ChurchRepository, NewChurch},
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_churches).post(create_church))
        .route("/:slug/join", post(join_church))
}

#[instrument(name = "GET /churches", skip(app_state))]
async fn list_churches(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Church>>, ApiError> {
    let churches = app_state.church_repo.list().await?;
    Ok(Json(churches))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateChurchBody {
    name: String,
    description: Option<String>,
    city: Option<String>,
    country: Option<String>,
    website: Option<String>,
}

#[instrument(name = "POST /churches", skip(app_state, body))]
async fn create_church(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateChurchBody>,
) -> Result<Json<Church>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ApiError::bad_request("name must contain letters or digits"));
    }
    if app_state.church_repo.find_by_slug(&slug).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "A church named '{name}' already exists"
        )));
    }

    let church = app_state
        .church_repo
        .create(NewChurch {
            slug,
            name: name.to_string(),
            description: body.description,
            city: body.city,
            country: body.country,
            website: body.website,
            created_by: actor.user_id,
        })
        .await?;

    Ok(Json(church))
}

#[instrument(name = "POST /churches/:slug/join", skip(app_state))]
async fn join_church(
    State(app_state): State<AppState>,
    actor: Actor,
    Path(slug): Path<String>,
) -> Result<Json<Church>, ApiError> {
    let church = app_state
        .church_repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("church '{slug}'")))?;

    app_state
        .church_repo
        .add_member(church.id, &actor.user_id)
        .await?;

    Ok(Json(church))
}

/// Lowercase the name and collapse every run of non-letter, non-digit
/// characters into a single hyphen. Letters from any script survive, so a
/// church named in Arabic or Korean keeps a usable slug.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_collapses_punctuation_and_spaces() {
        assert_eq!(slugify("Grace Chapel"), "grace-chapel");
        assert_eq!(slugify("  St. John's  Church  "), "st-john-s-church");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_keeps_non_latin_scripts() {
        assert_eq!(slugify("Église de Grâce"), "église-de-grâce");
        assert_eq!(slugify("은혜 교회"), "은혜-교회");
        assert_eq!(slugify("كنيسة النعمة"), "كنيسة-النعمة");
        assert_eq!(slugify("恩典教会"), "恩典教会");
    }
}
