//! Down payment normalization.
//!
//! The caller may give the down payment as a percent or as an amount; downstream code
//! always receives both, computed here once.

use crate::domain::{DownPayment, DownPaymentType};

/// Convert a down payment input into amount + percent of `home_value`.
///
/// The percent is `0` when `home_value <= 0` (no division by zero).
pub fn normalize(home_value: f64, value: f64, kind: DownPaymentType) -> DownPayment {
    match kind {
        DownPaymentType::Percent => DownPayment {
            amount: home_value * value / 100.0,
            percent: value,
        },
        DownPaymentType::Absolute => DownPayment {
            amount: value,
            percent: if home_value > 0.0 { value / home_value * 100.0 } else { 0.0 },
        },
    }
}

/// Financed amount, clamped at zero when the down payment exceeds the home value.
pub fn loan_amount(home_value: f64, down: &DownPayment) -> f64 {
    (home_value - down.amount).max(0.0)
}
