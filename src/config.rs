// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `GITHUB_API_URL` | GitHub REST API base URL | `https://api.github.com` |
//! | `GITHUB_TIMEOUT_SECS` | Timeout for each GitHub request | `30` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated browser origins | `http://localhost:3000,http://localhost:3001` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::github::client::DEFAULT_API_BASE_URL;
use crate::github::GatewayConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const GITHUB_API_URL_ENV: &str = "GITHUB_API_URL";
pub const GITHUB_TIMEOUT_ENV: &str = "GITHUB_TIMEOUT_SECS";
pub const CORS_ALLOWED_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";
/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GITHUB_API_URL is not a valid URL: {value}")]
    InvalidApiUrl { value: String },

    #[error("HOST is not a valid IP address: {value}")]
    InvalidHost { value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub gateway: GatewayConfig,
    pub github_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            gateway: GatewayConfig::default(),
            github_timeout: Duration::from_secs(DEFAULT_GITHUB_TIMEOUT_SECS),
            cors_allowed_origins: split_origins(DEFAULT_CORS_ALLOWED_ORIGINS),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// Unparseable numbers fall back to their defaults. A malformed host or
    /// API URL is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match lookup(HOST_ENV) {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost { value })?,
            None => defaults.host,
        };

        let port = lookup(PORT_ENV)
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let api_base_url = match lookup(GITHUB_API_URL_ENV) {
            Some(value) => {
                let trimmed = value.trim();
                match Url::parse(trimmed) {
                    Ok(url) if !url.cannot_be_a_base() => trimmed.to_string(),
                    _ => return Err(ConfigError::InvalidApiUrl { value }),
                }
            }
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let github_timeout = lookup(GITHUB_TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.github_timeout);

        let cors_allowed_origins = lookup(CORS_ALLOWED_ORIGINS_ENV)
            .map(|v| split_origins(&v))
            .unwrap_or(defaults.cors_allowed_origins);

        let log_format = LogFormat::parse(lookup(LOG_FORMAT_ENV).as_deref());

        Ok(Self {
            host,
            port,
            gateway: GatewayConfig { api_base_url },
            github_timeout,
            cors_allowed_origins,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
