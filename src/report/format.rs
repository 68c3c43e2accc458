//! Formatted terminal output for quotes and rates.
//!
//! We keep formatting code in one place so:
//! - the quote math stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{LoanType, QuoteRequest, QuoteResult, ResolvedRate};
use crate::quote::rate::AnchorQuote;

/// Format the full quote summary (inputs, rate, monthly breakdown).
pub fn format_quote(request: &QuoteRequest, quote: &QuoteResult) -> String {
    let mut out = String::new();

    out.push_str("=== mq - Mortgage Quote ===\n");
    out.push_str(&format!("Home value:    {}\n", fmt_money(request.home_value)));
    out.push_str(&format!(
        "Down payment:  {} ({:.3}%)\n",
        fmt_money(quote.down_payment_amount),
        quote.down_payment_percent
    ));
    out.push_str(&format!(
        "Loan:          {} | {} | {}y\n",
        fmt_money(quote.loan_amount),
        request.loan_type.display_name(),
        request.loan_term_years
    ));
    out.push_str(&format!("Rate:          {}\n", fmt_rate(&quote.rate)));
    out.push_str(&format!("PMI:           {:.3}% per year\n", quote.pmi_percent));
    if quote.insurance_estimated {
        out.push_str("Insurance:     estimated (home value x 0.3% x region factor)\n");
    }

    out.push_str("\nMonthly breakdown:\n");
    out.push_str(&format!("{:<22} {:>12}\n", "component", "monthly"));
    out.push_str(&format!("{:-<22} {:-<12}\n", "", ""));
    for (label, value) in quote.breakdown.labeled() {
        out.push_str(&format!("{label:<22} {:>12}\n", fmt_money(value)));
    }
    out.push_str(&format!("{:-<22} {:-<12}\n", "", ""));
    out.push_str(&format!("{:<22} {:>12}\n", "Total", fmt_money(quote.monthly_total)));

    if let Some(notice) = &quote.pmi_notice {
        out.push('\n');
        out.push_str(notice);
        out.push('\n');
    }

    out
}

/// One-line rate hint.
pub fn format_rate(loan_type: LoanType, term_years: u32, rate: &ResolvedRate) -> String {
    format!("{} {term_years}y: {}", loan_type.display_name(), fmt_rate(rate))
}

/// Latest observation per anchor series.
pub fn format_market(quotes: &[AnchorQuote]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:<12} {:>5} {:>8} {:<10} {:>10}\n",
        "series", "loan", "term", "latest", "as_of", "fallback"
    ));
    out.push_str(&format!(
        "{:-<14} {:-<12} {:->5} {:->8} {:-<10} {:->10}\n",
        "", "", "", "", "", ""
    ));
    for q in quotes {
        let loan = match q.loan_type {
            LoanType::Fixed => "fixed",
            LoanType::Adjustable => "adjustable",
        };
        let latest = q
            .observation
            .map(|o| format!("{:.3}", o.percent))
            .unwrap_or_else(|| "n/a".to_string());
        let as_of = q
            .observation
            .and_then(|o| o.date)
            .map(|d| d.to_string())
            .unwrap_or_default();
        let fallback = q
            .last_known_rate
            .map(|r| format!("{r:.3}"))
            .unwrap_or_default();
        out.push_str(
            format!(
                "{:<14} {:<12} {:>5} {:>8} {:<10} {:>10}\n",
                q.series_key, loan, q.term_years, latest, as_of, fallback
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn fmt_rate(rate: &ResolvedRate) -> String {
    match rate.as_of {
        Some(date) => format!("{:.3}% ({}, as of {date})", rate.annual_percent, rate.origin.label()),
        None => format!("{:.3}% ({})", rate.annual_percent, rate.origin.label()),
    }
}

/// `1234567.891` → `$1,234,567.89`.
fn fmt_money(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
