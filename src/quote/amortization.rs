//! Fixed-rate annuity payment.
//!
//! ```text
//! payment = P · r / (1 − (1 + r)^−n)
//! ```
//!
//! This is algebraically the textbook `P · r(1+r)^n / ((1+r)^n − 1)`. We evaluate the
//! discount factor as `exp(−n · ln(1 + r))` with `ln_1p`/`exp_m1` so the denominator
//! keeps full precision for tiny rates and never overflows for long terms.

/// Monthly principal & interest for a level-payment loan.
///
/// - `principal <= 0` or a zero term → `0`
/// - zero rate → straight-line `principal / n`
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let n = f64::from(term_years) * 12.0;
    if !(principal > 0.0) || n <= 0.0 {
        return 0.0;
    }

    let r = annual_rate_percent / 100.0 / 12.0;
    if !(r > 0.0) {
        return principal / n;
    }

    // 1 − (1 + r)^−n, computed without cancellation.
    let denom = -(-n * r.ln_1p()).exp_m1();
    principal * r / denom
}
