//! JSON shapes of the HTTP API.
//!
//! Browser forms send numbers as strings and leave optional fields blank, so every numeric
//! field accepts a JSON number, a numeric string, an empty string or `null`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DownPaymentType, LoanType, QuoteBreakdown, QuoteRequest, QuoteResult, RateOrigin, ResolvedRate};
use crate::error::AppError;
use crate::quote::round_rate;

const DEFAULT_TERM_YEARS: u32 = 30;

/// A number as sent by a form: `320000`, `"320000"` or `""`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    /// `Ok(None)` for a blank string; an error naming `field` for anything non-numeric.
    pub fn value(&self, field: &str) -> Result<Option<f64>, AppError> {
        match self {
            LenientNumber::Number(v) => Ok(Some(*v)),
            LenientNumber::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(None);
                }
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Some)
                    .ok_or_else(|| AppError::invalid(format!("{field} must be a number.")))
            }
        }
    }
}

fn optional(value: &Option<LenientNumber>, field: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) => v.value(field),
        None => Ok(None),
    }
}

fn required(value: &Option<LenientNumber>, field: &str) -> Result<f64, AppError> {
    optional(value, field)?.ok_or_else(|| AppError::invalid(format!("{field} is required.")))
}

/// `"Conventional"`/`"fixed"` or `"ARM"`/`"adjustable"`, case-insensitive. Blank means fixed.
pub fn parse_loan_type(raw: Option<&str>) -> Result<LoanType, AppError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    match raw.to_ascii_lowercase().as_str() {
        "" | "conventional" | "fixed" => Ok(LoanType::Fixed),
        "arm" | "adjustable" => Ok(LoanType::Adjustable),
        _ => Err(AppError::invalid(format!(
            "loan_type must be 'Conventional' or 'ARM' (got '{raw}')."
        ))),
    }
}

/// `"%"`/`"percent"` or `"$"`/`"amount"`/`"absolute"`. Blank means an amount.
pub fn parse_down_payment_type(raw: Option<&str>) -> Result<DownPaymentType, AppError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    match raw.to_ascii_lowercase().as_str() {
        "%" | "percent" => Ok(DownPaymentType::Percent),
        "" | "$" | "amount" | "absolute" => Ok(DownPaymentType::Absolute),
        _ => Err(AppError::invalid(format!(
            "down_payment_type must be '%' or '$' (got '{raw}')."
        ))),
    }
}

/// Whole years; blank means the 30-year default.
pub fn parse_term(value: &Option<LenientNumber>) -> Result<u32, AppError> {
    match optional(value, "loan_term")? {
        None => Ok(DEFAULT_TERM_YEARS),
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        Some(_) => Err(AppError::invalid("loan_term must be a whole number of years.")),
    }
}

/// Body of `POST /calculate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalculateRequest {
    pub zipcode: Option<String>,
    pub home_value: Option<LenientNumber>,
    pub down_payment_value: Option<LenientNumber>,
    pub down_payment_type: Option<String>,
    pub loan_type: Option<String>,
    pub loan_term: Option<LenientNumber>,
    pub property_tax: Option<LenientNumber>,
    pub pmi: Option<LenientNumber>,
    pub home_ins: Option<LenientNumber>,
    pub hoa: Option<LenientNumber>,
    /// `0` or blank means "look the rate up".
    pub interest_rate: Option<LenientNumber>,
    pub loan_amount: Option<LenientNumber>,
}

impl CalculateRequest {
    /// Convert and validate.
    pub fn into_request(self) -> Result<QuoteRequest, AppError> {
        let request = QuoteRequest {
            home_value: required(&self.home_value, "home_value")?,
            down_payment_value: required(&self.down_payment_value, "down_payment_value")?,
            down_payment_type: parse_down_payment_type(self.down_payment_type.as_deref())?,
            loan_type: parse_loan_type(self.loan_type.as_deref())?,
            loan_term_years: parse_term(&self.loan_term)?,
            property_tax_annual: optional(&self.property_tax, "property_tax")?.unwrap_or(0.0),
            hoa_monthly: optional(&self.hoa, "hoa")?.unwrap_or(0.0),
            pmi_override_percent: optional(&self.pmi, "pmi")?,
            insurance_annual_override: optional(&self.home_ins, "home_ins")?,
            region: self.zipcode.filter(|z| !z.trim().is_empty()),
            rate_override_percent: optional(&self.interest_rate, "interest_rate")?,
            loan_amount_override: optional(&self.loan_amount, "loan_amount")?,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Chart series keyed by display label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(rename = "Principal & Interest")]
    pub principal_and_interest: f64,
    #[serde(rename = "Property Tax")]
    pub property_tax: f64,
    #[serde(rename = "Insurance")]
    pub insurance: f64,
    #[serde(rename = "PMI")]
    pub pmi: f64,
    #[serde(rename = "HOA")]
    pub hoa: f64,
}

impl From<&QuoteBreakdown> for ChartData {
    fn from(b: &QuoteBreakdown) -> Self {
        Self {
            principal_and_interest: b.principal_and_interest,
            property_tax: b.property_tax,
            insurance: b.insurance,
            pmi: b.pmi,
            hoa: b.hoa,
        }
    }
}

/// Response of `POST /calculate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateResponse {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub rate_source: RateOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_as_of: Option<NaiveDate>,
    pub monthly_total: f64,
    pub pmi_percent: f64,
    pub down_payment_amount: f64,
    pub down_payment_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_notice: Option<String>,
    pub chart: ChartData,
}

impl From<QuoteResult> for CalculateResponse {
    fn from(q: QuoteResult) -> Self {
        Self {
            loan_amount: q.loan_amount,
            interest_rate: q.rate.annual_percent,
            rate_source: q.rate.origin,
            rate_as_of: q.rate.as_of,
            monthly_total: q.monthly_total,
            pmi_percent: q.pmi_percent,
            down_payment_amount: q.down_payment_amount,
            down_payment_percent: q.down_payment_percent,
            chart: ChartData::from(&q.breakdown),
            pmi_notice: q.pmi_notice,
        }
    }
}

/// Query of `GET /_rate_hint`. Values stay strings so blanks are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateHintQuery {
    pub loan_type: Option<String>,
    pub loan_term: Option<String>,
}

impl RateHintQuery {
    pub fn parse(&self) -> Result<(LoanType, u32), AppError> {
        let loan_type = parse_loan_type(self.loan_type.as_deref())?;
        let term = parse_term(&self.loan_term.clone().map(LenientNumber::Text))?;
        if term == 0 || term > crate::domain::MAX_TERM_YEARS {
            return Err(AppError::invalid(format!(
                "loan_term must be between 1 and {} years.",
                crate::domain::MAX_TERM_YEARS
            )));
        }
        Ok((loan_type, term))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateHintResponse {
    pub rate: f64,
    pub source: RateOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

impl From<ResolvedRate> for RateHintResponse {
    fn from(r: ResolvedRate) -> Self {
        Self {
            rate: round_rate(r.annual_percent),
            source: r.origin,
            as_of: r.as_of,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<QuoteRequest, AppError> {
        serde_json::from_value::<CalculateRequest>(value).unwrap().into_request()
    }

    #[test]
    fn form_strings_and_blanks_are_accepted() {
        let req = parse(json!({
            "zipcode": "84044",
            "home_value": "400000",
            "down_payment_value": 20,
            "down_payment_type": "%",
            "loan_type": "Conventional",
            "loan_term": "30",
            "property_tax": "4800",
            "pmi": "",
            "home_ins": null,
            "hoa": 50,
            "interest_rate": "0"
        }))
        .unwrap();

        assert_eq!(req.home_value, 400_000.0);
        assert_eq!(req.down_payment_type, DownPaymentType::Percent);
        assert_eq!(req.loan_type, LoanType::Fixed);
        assert_eq!(req.loan_term_years, 30);
        assert_eq!(req.property_tax_annual, 4_800.0);
        assert_eq!(req.pmi_override_percent, None);
        assert_eq!(req.insurance_annual_override, None);
        assert_eq!(req.region.as_deref(), Some("84044"));
        assert_eq!(req.rate_override_percent, Some(0.0));
    }

    #[test]
    fn defaults_are_amount_fixed_thirty_years() {
        let req = parse(json!({ "home_value": 300000, "down_payment_value": 30000 })).unwrap();
        assert_eq!(req.down_payment_type, DownPaymentType::Absolute);
        assert_eq!(req.loan_type, LoanType::Fixed);
        assert_eq!(req.loan_term_years, 30);
        assert_eq!(req.region, None);
    }

    #[test]
    fn loan_type_is_case_insensitive() {
        assert_eq!(parse_loan_type(Some("arm")).unwrap(), LoanType::Adjustable);
        assert_eq!(parse_loan_type(Some(" ARM ")).unwrap(), LoanType::Adjustable);
        assert!(parse_loan_type(Some("balloon")).unwrap_err().is_invalid_input());
    }

    #[test]
    fn missing_or_bad_fields_are_invalid() {
        let err = parse(json!({ "down_payment_value": 10 })).unwrap_err();
        assert!(err.message().contains("home_value"));

        let err = parse(json!({ "home_value": "abc", "down_payment_value": 10 })).unwrap_err();
        assert!(err.message().contains("home_value"));

        let err = parse(json!({ "home_value": 1, "down_payment_value": 1, "loan_term": 12.5 })).unwrap_err();
        assert!(err.message().contains("loan_term"));

        let err = parse(json!({ "home_value": -5, "down_payment_value": 1 })).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn astronomical_home_value_is_rejected() {
        let err = parse(json!({
            "home_value": 1e307,
            "down_payment_value": 20,
            "down_payment_type": "%"
        }))
        .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.message().contains("home_value"));
    }

    #[test]
    fn chart_uses_display_labels() {
        let chart = ChartData {
            principal_and_interest: 1.0,
            property_tax: 2.0,
            insurance: 3.0,
            pmi: 4.0,
            hoa: 5.0,
        };
        let value = serde_json::to_value(chart).unwrap();
        assert_eq!(value["Principal & Interest"], json!(1.0));
        assert_eq!(value["Property Tax"], json!(2.0));
        assert_eq!(value["HOA"], json!(5.0));
    }

    #[test]
    fn rate_hint_query_validates_term() {
        let q = RateHintQuery {
            loan_type: Some("ARM".to_string()),
            loan_term: Some("5".to_string()),
        };
        assert_eq!(q.parse().unwrap(), (LoanType::Adjustable, 5));

        let q = RateHintQuery {
            loan_type: None,
            loan_term: Some("0".to_string()),
        };
        assert!(q.parse().unwrap_err().is_invalid_input());
    }
}
