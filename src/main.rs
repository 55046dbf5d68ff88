mod auth;
mod config;
mod db;
mod error;
mod extractors;
mod mail;
mod pagination;
mod routes;
mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging first, so config and migration steps are visible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Config comes from the TOML file with CLI flags on top
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Uploaded images land here
    std::fs::create_dir_all(config.uploads_path())?;

    // Database, schema, and the one admin account
    let pool = db::create_pool(config.db_path())?;
    db::run_migrations(&pool)?;
    auth::seed_admin(&pool, &config.auth)?;

    // Contact-form delivery; falls back to logging without a relay
    let mailer = mail::from_config(&config.mail)?;

    let state = AppState {
        db: pool,
        config: config.clone(),
        mailer,
    };

    let mut app = Router::new()
        .route("/", get(routes::home::index).post(routes::home::contact))
        .route("/assets/{*path}", get(routes::assets::serve))
        .route("/uploads/{file}", get(routes::assets::serve_upload))
        .merge(routes::auth::router())
        .merge(routes::blog::router())
        .merge(routes::admin::router());

    // Test-only seed endpoint: creates an admin session, returns the cookie
    if std::env::var("TINTA_TEST_SEED").is_ok() {
        app = app.route("/test/seed", get(test_seed));
    }

    let app = app
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Test-only: create a session for the seeded admin and return its cookie.
/// Only mounted when TINTA_TEST_SEED env var is set.
async fn test_seed(State(state): State<AppState>) -> impl IntoResponse {
    // seed_admin ran at startup, so an admin row always exists
    let user_id: i64 = {
        let conn = state.db.get().unwrap();
        conn.query_row("SELECT id FROM users ORDER BY id LIMIT 1", [], |r| r.get(0))
            .unwrap()
    };

    let token = auth::session::create_session(&state.db, user_id, state.config.auth.session_hours)
        .unwrap();

    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            auth::session::session_cookie(&token, state.config.auth.session_hours),
        )],
        format!("{{\"user_id\":{}}}", user_id),
    )
}
