//! Runtime configuration from `.env` and the process environment.
//!
//! | variable               | default                                   |
//! |------------------------|-------------------------------------------|
//! | `FRED_API_KEY`         | unset (offline: static fallback rates)    |
//! | `MQ_FRED_BASE_URL`     | FRED `series/observations` endpoint       |
//! | `MQ_FRED_TIMEOUT_SECS` | `5`                                       |
//! | `MQ_HOST`              | `127.0.0.1`                               |
//! | `MQ_PORT`              | `3000`                                    |
//! | `MQ_LOG_LEVEL`         | `info`                                    |

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::data::fred::DEFAULT_BASE_URL;
use crate::error::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fred: FredConfig,
    pub server: ServerConfig,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct FredConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match get("MQ_FRED_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|s| (1..=MAX_TIMEOUT_SECS).contains(s))
                .ok_or_else(|| {
                    AppError::invalid(format!(
                        "MQ_FRED_TIMEOUT_SECS must be an integer between 1 and {MAX_TIMEOUT_SECS}."
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let port = match get("MQ_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::invalid("MQ_PORT must be a valid u16."))?,
            None => 3000,
        };

        Ok(Self {
            fred: FredConfig {
                api_key: get("FRED_API_KEY"),
                base_url: get("MQ_FRED_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            server: ServerConfig {
                host: get("MQ_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port,
            },
            log_level: get("MQ_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::invalid("MQ_HOST must parse to an IPv4 or IPv6 address."))?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config.fred.api_key, None);
        assert_eq!(config.fred.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.fred.timeout, Duration::from_secs(5));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = load(&[("FRED_API_KEY", "   ")]).unwrap();
        assert_eq!(config.fred.api_key, None);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("FRED_API_KEY", "abc"),
            ("MQ_FRED_TIMEOUT_SECS", "2"),
            ("MQ_HOST", "0.0.0.0"),
            ("MQ_PORT", "8080"),
            ("MQ_LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(config.fred.api_key.as_deref(), Some("abc"));
        assert_eq!(config.fred.timeout, Duration::from_secs(2));
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn rejects_unbounded_timeout_and_bad_port() {
        assert!(load(&[("MQ_FRED_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[("MQ_FRED_TIMEOUT_SECS", "300")]).is_err());
        let err = load(&[("MQ_PORT", "http")]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }
}
