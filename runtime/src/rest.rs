// Copyright 2026 Slant Contributors
// SPDX-License-Identifier: MIT

//! HTTP REST API for Slant.
//!
//! `POST /analyze` and `POST /scrape` share one handler. Errors are
//! returned as short plain-text bodies; see [`AnalyzeError`].

use crate::analyze::Analyzer;
use crate::errors::AnalyzeError;
use crate::types::ClassificationResult;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by every handler.
pub struct AppState {
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Arc<Self> {
        Arc::new(Self { analyzer })
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(handle_analyze))
        .route("/scrape", post(handle_analyze))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the REST API on all interfaces until Ctrl-C.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received shutdown signal");
        })
        .await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chromium_available": state.analyzer.can_scrape(),
    }))
}

/// The body is decoded by hand so any client content type is accepted and
/// malformed JSON maps onto the plain-text 400.
async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ClassificationResult>, AnalyzeError> {
    state.analyzer.analyze_body(&body).await.map(Json)
}
