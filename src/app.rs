//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads configuration
//! - builds the rate source and quote engine
//! - prints quotes, rate hints and market rates
//! - starts the HTTP server

use clap::Parser;

use crate::cli::{Command, QuoteArgs, RateArgs, RatesArgs, ServeArgs, ShowArgs};
use crate::config::AppConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mq` binary.
pub fn run() -> Result<(), AppError> {
    // `mq` alone starts the server and `mq --home-value ...` means `mq quote ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let config = AppConfig::load()?;

    // The server logs at the configured level; one-shot commands stay quiet unless asked.
    let level = match cli.command {
        Command::Serve(_) => config.log_level.as_str(),
        _ => "warn",
    };
    crate::telemetry::init(level)?;

    match cli.command {
        Command::Quote(args) => handle_quote(args, &config),
        Command::Rate(args) => handle_rate(args, &config),
        Command::Rates(args) => handle_rates(args, &config),
        Command::Show(args) => handle_show(args),
        Command::Serve(args) => handle_serve(args, config),
    }
}

fn handle_quote(args: QuoteArgs, config: &AppConfig) -> Result<(), AppError> {
    let request = args.to_request()?;

    let engine = pipeline::build_engine(&config.fred)?;
    let quote = pipeline::run_quote(&engine, &request)?;

    if args.json {
        println!("{}", to_json(&quote)?);
    } else {
        println!("{}", crate::report::format_quote(&request, &quote));
        if !args.no_plot {
            println!("{}", crate::plot::render_breakdown_chart(&quote.breakdown, args.width));
        }
    }

    if let Some(path) = &args.export {
        crate::io::write_quote_json(path, &request, &quote)?;
    }

    Ok(())
}

fn handle_rate(args: RateArgs, config: &AppConfig) -> Result<(), AppError> {
    if args.term == 0 || args.term > crate::domain::MAX_TERM_YEARS {
        return Err(AppError::invalid(format!(
            "--term must be between 1 and {} years.",
            crate::domain::MAX_TERM_YEARS
        )));
    }

    let engine = pipeline::build_engine(&config.fred)?;
    let rate = engine.resolver().resolve(args.loan_type, args.term);

    if args.json {
        println!("{}", to_json(&rate)?);
    } else {
        println!("{}", crate::report::format_rate(args.loan_type, args.term, &rate));
    }
    Ok(())
}

fn handle_rates(args: RatesArgs, config: &AppConfig) -> Result<(), AppError> {
    let engine = pipeline::build_engine(&config.fred)?;
    let snapshot = engine.resolver().market_snapshot();

    if args.json {
        println!("{}", to_json(&snapshot)?);
    } else {
        print!("{}", crate::report::format_market(&snapshot));
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let file = crate::io::read_quote_json(&args.path)?;

    if args.json {
        println!("{}", to_json(&file.result)?);
    } else {
        println!("Quote generated {} by {}", file.generated_at.format("%Y-%m-%d %H:%M UTC"), file.tool);
        println!("{}", crate::report::format_quote(&file.request, &file.result));
        if !args.no_plot {
            println!("{}", crate::plot::render_breakdown_chart(&file.result.breakdown, args.width));
        }
    }
    Ok(())
}

fn handle_serve(mut args: ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    let addr = config.server.socket_addr()?;

    // The blocking FRED client must be created outside the async runtime.
    let engine = pipeline::build_engine(&config.fred)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(crate::server::serve(addr, engine))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::runtime(format!("Failed to encode JSON: {e}")))
}

/// Rewrite argv so `mq` defaults to `mq serve` and bare flags mean `mq quote`.
///
/// Rules:
/// - `mq`                      -> `mq serve`
/// - `mq --home-value 1 ...`   -> `mq quote --home-value 1 ...`
/// - `mq --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "quote" | "rate" | "rates" | "show" | "serve");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "quote flags".
    if arg1.starts_with('-') {
        argv.insert(1, "quote".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
