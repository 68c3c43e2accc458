//! HTTP API.
//!
//! - `POST /calculate`: full quote for a form-style request
//! - `GET /_rate_hint`: resolved rate for a loan type and term
//! - `GET /rates`: latest value of every anchor series
//! - `GET /health`: liveness

pub mod routes;
pub mod wire;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Extension;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::quote::QuoteEngine;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QuoteEngine>,
}

pub fn router(engine: Arc<QuoteEngine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::healthcheck))
        .route("/calculate", post(routes::calculate_endpoint))
        .route("/_rate_hint", get(routes::rate_hint_endpoint))
        .route("/rates", get(routes::rates_endpoint))
        .layer(Extension(AppState { engine }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn serve(addr: SocketAddr, engine: QuoteEngine) -> Result<(), AppError> {
    let app = router(Arc::new(engine));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::runtime(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "mortgage quote API listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::runtime(format!("Server error: {e}")))
}
