use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::npi_client::DEFAULT_REGISTRY_URL;
use crate::registry::PostalCodeFormat;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where provider data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Query the NPI Registry API directly.
    Registry { base_url: String },
    /// Forward to a remote NPI API service.
    Forwarding { base_url: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub upstream: UpstreamMode,
    pub request_timeout: Duration,
    pub postal_code_format: PostalCodeFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("NPI_REQUEST_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("NPI_POSTAL_CODE_FORMAT must be one of: zip5, full")]
    InvalidPostalCodeFormat,
    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8000);

        let upstream = match var("NPI_API_BASE_URL") {
            Some(base_url) => UpstreamMode::Forwarding {
                base_url: validate_url("NPI_API_BASE_URL", base_url)?,
            },
            None => UpstreamMode::Registry {
                base_url: validate_url(
                    "NPI_REGISTRY_URL",
                    var("NPI_REGISTRY_URL").unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
                )?,
            },
        };

        let timeout_secs = var("NPI_REQUEST_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>().map_err(|_| ConfigError::InvalidTimeout))
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let postal_code_format = var("NPI_POSTAL_CODE_FORMAT")
            .map(|value| {
                PostalCodeFormat::parse(&value).ok_or(ConfigError::InvalidPostalCodeFormat)
            })
            .transpose()?
            .unwrap_or_default();

        let config = Self {
            bind_addr,
            bind_port,
            upstream,
            request_timeout: Duration::from_secs(timeout_secs),
            postal_code_format,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn validate_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::InvalidUrl(key))
    }
}
