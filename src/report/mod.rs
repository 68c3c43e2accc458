//! Reporting utilities: terminal summaries for quotes, rate hints and market rates.

pub mod format;

pub use format::*;
