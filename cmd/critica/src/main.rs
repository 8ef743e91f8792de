//! # Critica Binary
//!
//! The entry point that assembles the application: configuration, the
//! sqlite store, the auth adapters, the service layer, and the axum
//! router.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use api_adapters::AppState;
use auth_adapters::{ConfirmationCodes, JwtIssuer, LogDispatcher};
use configs::Settings;
use services::{AccountService, CatalogService, CommentService, ReviewService, ScoreBounds};
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().context("loading configuration")?;

    let store = Arc::new(
        SqliteStore::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("opening database")?,
    );
    let tokens = Arc::new(JwtIssuer::new(
        settings.auth.jwt_secret.expose_secret(),
        settings.auth.token_ttl_hours,
    ));
    let codes = Arc::new(ConfirmationCodes::new(settings.auth.code_length));
    let bounds = ScoreBounds {
        min: settings.reviews.score_min,
        max: settings.reviews.score_max,
    };

    let state = AppState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            tokens,
            codes,
            Arc::new(LogDispatcher),
        )),
        catalog: Arc::new(CatalogService::new(store.clone())),
        reviews: Arc::new(ReviewService::new(store.clone(), store.clone(), bounds)),
        comments: Arc::new(CommentService::new(store)),
        page_size: settings.api.page_size,
    };

    let app = api_adapters::router(state);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "critica listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
