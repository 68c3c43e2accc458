//! `mortgage-quote` library crate.
//!
//! The binary (`mq`) is a thin wrapper around this library so that:
//!
//! - the quote engine is testable without spawning processes or servers
//! - the CLI and the HTTP API share one pipeline
//! - rate sources and estimators can be swapped behind traits

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod quote;
pub mod report;
pub mod server;
pub mod telemetry;
