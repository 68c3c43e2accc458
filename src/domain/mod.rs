//! Domain types used throughout the quote pipeline.
//!
//! This module defines:
//!
//! - input enums and the boundary-validated request (`LoanType`, `QuoteRequest`)
//! - rate provenance (`RateAnchor`, `RateObservation`, `ResolvedRate`)
//! - quote outputs (`DownPayment`, `QuoteBreakdown`, `QuoteResult`)

pub mod types;

pub use types::*;
