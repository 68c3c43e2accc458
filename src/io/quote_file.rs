//! Read request files and write quote JSON.
//!
//! A quote file is the portable record of one run: the request as given plus the
//! result, stamped with when it was produced. The schema is [`QuoteFile`].

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{QuoteRequest, QuoteResult};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub request: QuoteRequest,
    pub result: QuoteResult,
}

impl QuoteFile {
    pub fn new(request: &QuoteRequest, result: &QuoteResult) -> Self {
        Self {
            tool: "mq".to_string(),
            generated_at: Utc::now(),
            request: request.clone(),
            result: result.clone(),
        }
    }
}

/// Read a [`QuoteRequest`] JSON file. Validation is left to the caller.
pub fn read_request_json(path: &Path) -> Result<QuoteRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("Failed to open request JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::invalid(format!("Invalid request JSON: {e}")))
}

pub fn write_quote_json(path: &Path, request: &QuoteRequest, result: &QuoteResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create quote JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &QuoteFile::new(request, result))
        .map_err(|e| AppError::runtime(format!("Failed to write quote JSON: {e}")))?;

    Ok(())
}

pub fn read_quote_json(path: &Path) -> Result<QuoteFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("Failed to open quote JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::invalid(format!("Invalid quote JSON: {e}")))
}
