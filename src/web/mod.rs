// Web server — Axum-based JSON API for the browser UI.
//
// POST /api/analyze runs one analysis; POST /api/rewrite forwards a text and
// its keywords to the configured rewrite provider; GET /health is a liveness
// probe. No state survives between requests: AppState only holds the shared,
// immutable analysis service and the rewrite provider.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::rewrite::Rewriter;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<AnalysisService>,
    pub rewriter: Arc<dyn Rewriter>,
}

impl AppState {
    /// State wired from configuration: analysis limits, stopwords and the
    /// configured rewrite provider.
    pub fn from_config(config: Config) -> Self {
        let analyzer = Arc::new(config.analysis_service());
        let rewriter = config.create_rewriter();
        Self {
            config: Arc::new(config),
            analyzer,
            rewriter,
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    let state = AppState::from_config(config);
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("keygap API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(handlers::analyze::analyze))
        .route("/api/rewrite", post(handlers::rewrite::rewrite))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe — always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
