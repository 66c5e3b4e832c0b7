pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::Database;
use crate::store::ProgressStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub catalog: Arc<Catalog>,
}

impl<S: ProgressStore> AppState<S> {
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
        }
    }
}

/// Build the API router over any progress store.
pub fn router<S: ProgressStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/grade", post(routes::grading::grade::<S>))
        .route("/api/study/next", post(routes::study::next::<S>))
        .route("/api/study/prefetch", post(routes::study::prefetch::<S>))
        .route(
            "/api/level",
            get(routes::level::get::<S>).put(routes::level::set::<S>),
        )
        .route("/api/attempts", post(routes::attempts::submit::<S>))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    tracing::info!("Loading phrase catalog...");
    let catalog = Catalog::load(&config)?;

    let app = router(AppState::new(db, catalog)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
