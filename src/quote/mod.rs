//! The mortgage quote engine.
//!
//! Responsibilities:
//!
//! - normalize the down payment (`down_payment`)
//! - resolve an interest rate with graceful degradation (`rate`)
//! - estimate PMI and insurance (`pmi`, `insurance`)
//! - amortize the loan (`amortization`)
//! - assemble the monthly breakdown (`engine`)

pub mod amortization;
pub mod down_payment;
pub mod engine;
pub mod insurance;
pub mod pmi;
pub mod rate;

pub use engine::QuoteEngine;
pub use rate::{AnchorQuote, RateResolver};

/// Round to cents.
pub fn round_money(v: f64) -> f64 {
    round_to(v, 2)
}

/// Round a percent rate for display.
pub fn round_rate(v: f64) -> f64 {
    round_to(v, 3)
}

fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let scaled = v * scale;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / scale
}
