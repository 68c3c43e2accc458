use axum::Extension;
use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde_json::json;

use crate::error::AppError;
use crate::quote::AnchorQuote;
use crate::server::AppState;
use crate::server::wire::{CalculateRequest, CalculateResponse, RateHintQuery, RateHintResponse};

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn calculate_endpoint(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::invalid(e.body_text()))?;
    let request = payload.into_request()?;

    let quote = blocking(move || state.engine.quote(&request)).await?;
    Ok(Json(quote.into()))
}

pub(crate) async fn rate_hint_endpoint(
    Extension(state): Extension<AppState>,
    query: Result<Query<RateHintQuery>, QueryRejection>,
) -> Result<Json<RateHintResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::invalid(e.body_text()))?;
    let (loan_type, term) = query.parse()?;

    let rate = blocking(move || state.engine.resolver().resolve(loan_type, term)).await?;
    Ok(Json(rate.into()))
}

pub(crate) async fn rates_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<AnchorQuote>>, AppError> {
    let snapshot = blocking(move || state.engine.resolver().market_snapshot()).await?;
    Ok(Json(snapshot))
}

/// Rate lookups do blocking HTTP; keep them off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::runtime(format!("Quote task failed: {e}")))
}
