//! Client configuration.
//!
//! Provides a `ClientConfig` shared by every front end to locate the notes
//! API and bound each HTTP request.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Production API used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://react-notes-app-back-production-c147.up.railway.app";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

const ENV_API_URL: &str = "NOTEFOLD_API_URL";
const ENV_HTTP_TIMEOUT_SECS: &str = "NOTEFOLD_HTTP_TIMEOUT_SECS";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build a config from explicit values, falling back to defaults.
    pub fn new(api_base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        let api_base_url = match normalize_text_option(api_base_url) {
            Some(url) => normalize_base_url(&url)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Load configuration from `NOTEFOLD_API_URL` / `NOTEFOLD_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        parse_config(|key| env::var(key).ok())
    }

    /// Overlay environment values on top of `self`; env wins when set.
    pub fn with_env_overrides(self) -> Result<Self> {
        let env_config = parse_partial(|key| env::var(key).ok())?;
        Ok(Self {
            api_base_url: env_config.0.unwrap_or(self.api_base_url),
            request_timeout: env_config
                .1
                .map_or(self.request_timeout, Duration::from_secs),
        })
    }
}

/// Trim, require an http(s) scheme, and strip the trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(&base) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

fn parse_config<F>(get: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (url, timeout) = parse_partial(get)?;
    ClientConfig::new(url, timeout)
}

fn parse_partial<F>(get: F) -> Result<(Option<String>, Option<u64>)>
where
    F: Fn(&str) -> Option<String>,
{
    let url = normalize_text_option(get(ENV_API_URL))
        .map(|url| normalize_base_url(&url))
        .transpose()?;
    let timeout = normalize_text_option(get(ENV_HTTP_TIMEOUT_SECS))
        .map(|raw| {
            raw.parse::<u64>().map_err(|error| {
                Error::Config(format!("{ENV_HTTP_TIMEOUT_SECS} must be an integer: {error}"))
            })
        })
        .transpose()?;
    Ok((url, timeout))
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
