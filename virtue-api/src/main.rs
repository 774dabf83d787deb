use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod domain;
mod repositories;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./virtue-api/.env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,virtue_api=debug")),
        )
        .init();

    let config = config::read_config().context("Failed to read configuration")?;

    let connection_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_with(config.database.with_db())
        .await
        .context("Failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .context("Failed to run database migrations")?;

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Listening on {}", address);

    let app = router::create(connection_pool, &config);
    axum::serve(listener, app)
        .await
        .context("Server exited with an error")?;

    Ok(())
}
