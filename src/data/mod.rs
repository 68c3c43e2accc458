//! Market rate sources.
//!
//! The quote engine only sees the [`RateSource`] trait. Implementations must never
//! panic or return errors: an unavailable series is simply `None`.

pub mod fred;

pub use fred::FredClient;

use crate::domain::RateObservation;

/// Latest single observation for a named rate series.
pub trait RateSource: Send + Sync {
    fn latest(&self, series_key: &str) -> Option<RateObservation>;
}

/// Source used when no upstream is configured. Every lookup is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl RateSource for OfflineSource {
    fn latest(&self, _series_key: &str) -> Option<RateObservation> {
        None
    }
}
