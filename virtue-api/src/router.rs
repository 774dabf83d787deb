use axum::{http::Method, routing::get, Router};
use sqlx::PgPool;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, config::Settings, routes};

pub fn create(connection_pool: PgPool, config: &Settings) -> Router<()> {
    let app = Router::new()
        .route("/", get(|| async { "Our Virtue API" }))
        .nest(
            "/threads",
            routes::threads::router().merge(routes::comments::router()),
        )
        .nest("/votes", routes::votes::router())
        .nest("/churches", routes::churches::router())
        .nest("/book-requests", routes::book_requests::router())
        .nest("/poverty-data", routes::poverty_data::router())
        .nest("/search", routes::search::router());

    let app_state = AppState::new(connection_pool, config);

    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(["content-type".parse().unwrap()])
        .allow_credentials(true)
        .allow_origin(tower_http::cors::AllowOrigin::predicate(move |origin, _| {
            origin.to_str().is_ok_and(|origin| origin == app_url)
        }));

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
