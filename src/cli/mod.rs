//! Command-line parsing for the mortgage quote tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the quote math.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DownPaymentType, LoanType, QuoteRequest};
use crate::error::AppError;
use crate::io::read_request_json;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mq", version, about = "Monthly mortgage payment quotes (FRED-based rates)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote a monthly payment and print the breakdown.
    Quote(QuoteArgs),
    /// Print the resolved annual rate for a loan type and term.
    Rate(RateArgs),
    /// Print the latest value of every market rate series.
    Rates(RatesArgs),
    /// Re-render a quote written by `mq quote --export`.
    Show(ShowArgs),
    /// Run the HTTP API (`POST /calculate`, `GET /_rate_hint`, `GET /rates`).
    Serve(ServeArgs),
}

/// Loan inputs and output options for `mq quote`.
#[derive(Debug, Parser, Clone)]
pub struct QuoteArgs {
    /// Read the whole request from a JSON file instead of flags.
    #[arg(long, value_name = "JSON", conflicts_with = "home_value")]
    pub request: Option<PathBuf>,

    /// Purchase price / appraised value.
    #[arg(long)]
    pub home_value: Option<f64>,

    /// Down payment, as a percent or an amount (see --down-type).
    #[arg(short = 'd', long = "down", default_value_t = 20.0)]
    pub down_payment: f64,

    #[arg(long, value_enum, default_value_t = DownPaymentType::Percent)]
    pub down_type: DownPaymentType,

    /// Loan type (fixed/conventional or adjustable/arm).
    #[arg(short = 'l', long, value_enum, default_value_t = LoanType::Fixed)]
    pub loan_type: LoanType,

    /// Loan term in years.
    #[arg(short = 't', long, default_value_t = 30)]
    pub term: u32,

    /// Annual property tax.
    #[arg(long, default_value_t = 0.0)]
    pub property_tax: f64,

    /// Monthly HOA dues.
    #[arg(long, default_value_t = 0.0)]
    pub hoa: f64,

    /// Annual PMI percent; overrides the down-payment table.
    #[arg(long)]
    pub pmi: Option<f64>,

    /// Annual homeowners insurance; overrides the estimate.
    #[arg(long)]
    pub insurance: Option<f64>,

    /// Zip code used for the insurance region estimate.
    #[arg(long)]
    pub zip: Option<String>,

    /// Annual interest rate in percent; skips market rate lookup.
    #[arg(long)]
    pub rate: Option<f64>,

    /// Explicit loan amount (e.g. for refinances).
    #[arg(long)]
    pub loan_amount: Option<f64>,

    /// Print the quote as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Disable the terminal bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 40)]
    pub width: usize,

    /// Write request + quote to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl QuoteArgs {
    /// Build the request from `--request` or from flags. Not yet validated.
    pub fn to_request(&self) -> Result<QuoteRequest, AppError> {
        if let Some(path) = &self.request {
            return read_request_json(path);
        }

        let home_value = self
            .home_value
            .ok_or_else(|| AppError::invalid("Provide --home-value or --request <file.json>."))?;

        Ok(QuoteRequest {
            home_value,
            down_payment_value: self.down_payment,
            down_payment_type: self.down_type,
            loan_type: self.loan_type,
            loan_term_years: self.term,
            property_tax_annual: self.property_tax,
            hoa_monthly: self.hoa,
            pmi_override_percent: self.pmi,
            insurance_annual_override: self.insurance,
            region: self.zip.clone(),
            rate_override_percent: self.rate,
            loan_amount_override: self.loan_amount,
        })
    }
}

#[derive(Debug, Parser, Clone)]
pub struct RateArgs {
    #[arg(short = 'l', long, value_enum, default_value_t = LoanType::Fixed)]
    pub loan_type: LoanType,

    /// Loan term in years.
    #[arg(short = 't', long, default_value_t = 30)]
    pub term: u32,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct RatesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Quote JSON produced by `--export`.
    #[arg(value_name = "JSON")]
    pub path: PathBuf,

    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub no_plot: bool,

    #[arg(long, default_value_t = 40)]
    pub width: usize,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ServeArgs {
    /// Override MQ_HOST.
    #[arg(long)]
    pub host: Option<String>,

    /// Override MQ_PORT.
    #[arg(long)]
    pub port: Option<u16>,
}
