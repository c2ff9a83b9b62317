use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cache::SnapshotCache;
use crate::source::{OpenSkyClient, SnapshotSource};

use super::api::airports as airport_handlers;
use super::api::planes as plane_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<SnapshotCache>,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let source = OpenSkyClient::new(config.opensky.clone()).map_err(std::io::Error::other)?;
    let app = build_router(config, Arc::new(source));

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

pub fn build_router(config: Config, source: Arc<dyn SnapshotSource>) -> Router {
    let cache = SnapshotCache::new(source, config.thresholds, config.refresh.interval);

    let state = AppState {
        config: Arc::new(config),
        cache: Arc::new(cache),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/planes", get(plane_handlers::get_planes))
        .route("/api/airports", get(airport_handlers::list_airports))
        .route("/api/thresholds", get(airport_handlers::thresholds))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
