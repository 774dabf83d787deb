use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    app_state::AppState,
    repositories::{
        NewPovertyDataSource, PovertyDataFilter, PovertyDataRepository, PovertyDataSource,
    },
};

use super::{Actor, ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_sources).post(create_source))
}

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSourcesQuery {
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
    data_type: Option<String>,
    geographic_scope: Option<String>,
    verified: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaginationMeta {
    page: i64,
    limit: i64,
    total: i64,
    pages: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListSourcesResponse {
    data_sources: Vec<PovertyDataSource>,
    pagination: PaginationMeta,
}

/// Clamp the requested page and limit to sane bounds and return the
/// resulting row window as `(offset, limit)`.
fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    ((page - 1) * limit, limit, page)
}

fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[instrument(name = "GET /poverty-data", skip(app_state))]
async fn list_sources(
    State(app_state): State<AppState>,
    Query(query): Query<ListSourcesQuery>,
) -> Result<Json<ListSourcesResponse>, ApiError> {
    let (offset, limit, page) = page_window(query.page, query.limit);
    let filter = PovertyDataFilter {
        search: query.search,
        data_type: query.data_type,
        geographic_scope: query.geographic_scope,
        verified_only: query.verified == Some(true),
    };

    let result = app_state
        .poverty_data_repo
        .list(&filter, offset, limit)
        .await?;

    Ok(Json(ListSourcesResponse {
        pagination: PaginationMeta {
            page,
            limit,
            total: result.total,
            pages: page_count(result.total, limit),
        },
        data_sources: result.records,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSourceBody {
    title: String,
    description: Option<String>,
    source_url: String,
    source_org: Option<String>,
    data_table: serde_json::Value,
    geographic_scope: String,
    time_range: Option<String>,
    data_type: String,
    submission_notes: Option<String>,
}

#[instrument(name = "POST /poverty-data", skip(app_state, body))]
async fn create_source(
    State(app_state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateSourceBody>,
) -> Result<(StatusCode, Json<PovertyDataSource>), ApiError> {
    let title = body.title.trim();
    let source_url = body.source_url.trim();
    let geographic_scope = body.geographic_scope.trim();
    let data_type = body.data_type.trim();
    if title.is_empty() || source_url.is_empty() || geographic_scope.is_empty() || data_type.is_empty() {
        return Err(ApiError::bad_request(
            "Missing required fields: title, sourceUrl, dataTable, geographicScope, dataType",
        ));
    }
    if !body.data_table.is_object() {
        return Err(ApiError::bad_request(
            "dataTable must be a valid JSON object",
        ));
    }
    if reqwest::Url::parse(source_url).is_err() {
        return Err(ApiError::bad_request("sourceUrl must be a valid URL"));
    }

    let record = app_state
        .poverty_data_repo
        .create(NewPovertyDataSource {
            title: title.to_string(),
            description: body.description,
            source_url: source_url.to_string(),
            source_org: body.source_org,
            data_table: body.data_table,
            geographic_scope: geographic_scope.to_string(),
            time_range: body.time_range,
            data_type: data_type.to_string(),
            submission_notes: body.submission_notes,
            submitter_id: actor.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (0, 10, 1));
        assert_eq!(page_window(Some(3), Some(25)), (50, 25, 3));
        // Nonsense values fall back to the first page and bounded limits.
        assert_eq!(page_window(Some(0), Some(0)), (0, 1, 1));
        assert_eq!(page_window(Some(-4), Some(10_000)), (0, 100, 1));
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(3, 10), 1);
    }

    #[test]
    fn source_urls_are_validated() {
        assert!(reqwest::Url::parse("https://data.worldbank.org/poverty").is_ok());
        assert!(reqwest::Url::parse("not a url").is_err());
        assert!(reqwest::Url::parse("/relative/path").is_err());
    }
}
