//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from CLI flags, request files, or HTTP bodies
//! - passed between the quote components as immutable values
//! - exported to JSON and reloaded later

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest loan term accepted at the boundary (600 monthly periods).
pub const MAX_TERM_YEARS: u32 = 50;

/// Largest accepted currency amount. Keeps every intermediate product finite.
pub const MAX_MONEY: f64 = 1e12;

/// Largest accepted annual percent (interest rate, PMI).
pub const MAX_PERCENT: f64 = 100.0;

/// Loan product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    /// Fixed-rate ("Conventional") loan.
    #[serde(alias = "conventional")]
    #[value(alias = "conventional")]
    Fixed,
    /// Adjustable-rate ("ARM") loan.
    #[serde(alias = "arm")]
    #[value(alias = "arm")]
    Adjustable,
}

impl LoanType {
    pub fn display_name(self) -> &'static str {
        match self {
            LoanType::Fixed => "Conventional (fixed)",
            LoanType::Adjustable => "ARM (adjustable)",
        }
    }
}

/// How the down payment value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DownPaymentType {
    /// Percentage of the home value (`20` means 20%).
    Percent,
    /// Currency amount.
    Absolute,
}

/// Everything needed to quote one monthly payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub home_value: f64,
    pub down_payment_value: f64,
    pub down_payment_type: DownPaymentType,
    pub loan_type: LoanType,
    pub loan_term_years: u32,
    #[serde(default)]
    pub property_tax_annual: f64,
    #[serde(default)]
    pub hoa_monthly: f64,
    /// Annual PMI as a percent of the loan amount; bypasses the step table.
    #[serde(default)]
    pub pmi_override_percent: Option<f64>,
    #[serde(default)]
    pub insurance_annual_override: Option<f64>,
    /// Zip code or other region string; only the leading two digits are used.
    #[serde(default)]
    pub region: Option<String>,
    /// Annual interest rate supplied by the caller; bypasses rate resolution when > 0.
    #[serde(default)]
    pub rate_override_percent: Option<f64>,
    /// Explicit loan amount; replaces `home_value - down_payment`.
    #[serde(default)]
    pub loan_amount_override: Option<f64>,
}

impl QuoteRequest {
    /// Boundary validation. The quote engine assumes a request that passed this.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.home_value.is_finite() && self.home_value > 0.0) {
            return Err(AppError::invalid("home_value must be a positive number."));
        }
        if self.home_value > MAX_MONEY {
            return Err(AppError::invalid(format!("home_value must not exceed {MAX_MONEY:e}.")));
        }
        match self.down_payment_type {
            DownPaymentType::Percent => bounded("down_payment_value", self.down_payment_value, MAX_PERCENT)?,
            DownPaymentType::Absolute => bounded("down_payment_value", self.down_payment_value, MAX_MONEY)?,
        }
        if self.loan_term_years == 0 || self.loan_term_years > MAX_TERM_YEARS {
            return Err(AppError::invalid(format!(
                "loan_term must be between 1 and {MAX_TERM_YEARS} years."
            )));
        }
        bounded("property_tax", self.property_tax_annual, MAX_MONEY)?;
        bounded("hoa", self.hoa_monthly, MAX_MONEY)?;
        if let Some(v) = self.pmi_override_percent {
            bounded("pmi", v, MAX_PERCENT)?;
        }
        if let Some(v) = self.insurance_annual_override {
            bounded("home_ins", v, MAX_MONEY)?;
        }
        if let Some(v) = self.rate_override_percent {
            bounded("interest_rate", v, MAX_PERCENT)?;
        }
        if let Some(v) = self.loan_amount_override {
            bounded("loan_amount", v, MAX_MONEY)?;
        }
        Ok(())
    }
}

/// Non-negative, finite and at most `max`.
fn bounded(field: &str, value: f64, max: f64) -> Result<(), AppError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(AppError::invalid(format!("{field} must be a non-negative number.")));
    }
    if value > max {
        return Err(AppError::invalid(format!("{field} must not exceed {max}.")));
    }
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            home_value: 400_000.0,
            down_payment_value: 20.0,
            down_payment_type: DownPaymentType::Percent,
            loan_type: LoanType::Fixed,
            loan_term_years: 30,
            property_tax_annual: 4_800.0,
            hoa_monthly: 50.0,
            pmi_override_percent: None,
            insurance_annual_override: None,
            region: Some("84044".to_string()),
            rate_override_percent: None,
            loan_amount_override: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_home_value() {
        let mut req = request();
        req.home_value = 0.0;
        let err = req.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.message().contains("home_value"));

        req.home_value = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_percent_above_hundred_but_not_large_amounts() {
        let mut req = request();
        req.down_payment_value = 100.5;
        assert!(req.validate().is_err());

        req.down_payment_type = DownPaymentType::Absolute;
        req.down_payment_value = 500_000.0;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_term_and_negative_overrides() {
        let mut req = request();
        req.loan_term_years = 0;
        assert!(req.validate().is_err());
        req.loan_term_years = MAX_TERM_YEARS + 1;
        assert!(req.validate().is_err());

        let mut req = request();
        req.pmi_override_percent = Some(-0.1);
        let err = req.validate().unwrap_err();
        assert!(err.message().contains("pmi"));
    }

    #[test]
    fn rejects_magnitudes_that_would_overflow() {
        let mut req = request();
        req.home_value = 1e307;
        let err = req.validate().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.message().contains("home_value"));

        let mut req = request();
        req.property_tax_annual = MAX_MONEY * 2.0;
        assert!(req.validate().unwrap_err().message().contains("property_tax"));

        let mut req = request();
        req.rate_override_percent = Some(250.0);
        assert!(req.validate().unwrap_err().message().contains("interest_rate"));

        let mut req = request();
        req.home_value = MAX_MONEY;
        req.loan_amount_override = Some(MAX_MONEY);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn loan_type_accepts_product_aliases() {
        let fixed: LoanType = serde_json::from_str("\"conventional\"").unwrap();
        let arm: LoanType = serde_json::from_str("\"arm\"").unwrap();
        assert_eq!(fixed, LoanType::Fixed);
        assert_eq!(arm, LoanType::Adjustable);
    }
}
