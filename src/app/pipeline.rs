//! Shared quote pipeline used by both the CLI and the HTTP server.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! config -> rate source -> engine -> validate -> quote
//!
//! The front-ends then only deal with parsing input and presenting output.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::FredConfig;
use crate::data::{FredClient, OfflineSource, RateSource};
use crate::domain::{QuoteRequest, QuoteResult};
use crate::error::AppError;
use crate::quote::QuoteEngine;

/// Pick the rate source for this process.
///
/// Without an API key every rate comes from the static fallback table.
pub fn rate_source(config: &FredConfig) -> Result<Arc<dyn RateSource>, AppError> {
    match FredClient::from_config(config)? {
        Some(client) => {
            info!(timeout = ?config.timeout, "using FRED rate source");
            Ok(Arc::new(client))
        }
        None => {
            warn!("FRED_API_KEY not set; quoting with static fallback rates");
            Ok(Arc::new(OfflineSource))
        }
    }
}

pub fn build_engine(config: &FredConfig) -> Result<QuoteEngine, AppError> {
    Ok(QuoteEngine::new(rate_source(config)?))
}

/// Validate at the boundary, then quote.
pub fn run_quote(engine: &QuoteEngine, request: &QuoteRequest) -> Result<QuoteResult, AppError> {
    request.validate()?;
    Ok(engine.quote(request))
}
