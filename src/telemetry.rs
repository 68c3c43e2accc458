//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// Output goes to stderr so `mq quote --json` keeps a clean stdout.
pub fn init(default_level: &str) -> Result<(), AppError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| {
            AppError::invalid(format!("invalid log level/filter '{default_level}': {e}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| AppError::runtime(format!("telemetry error: {e}")))
}
