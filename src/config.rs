//! Process configuration, read once from the environment at startup.

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://www.kingofapes.fun",
    "https://frontendv2-mxw8.onrender.com",
    "http://localhost:4003"
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("VALIDATE_GENERATION_PARAMS must be true or false, got {0:?}")]
    InvalidFlag(String),

    #[error("ALLOWED_ORIGINS entries must be explicit origins like https://example.com, got {0:?}")]
    InvalidOrigin(String)
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the completion provider. Never leaves the server.
    pub openai_api_key: String,
    /// Shared secret every caller sends in `X-API-Key`.
    pub client_api_key: String,
    pub port: u16,
    pub openai_base_url: String,
    pub allowed_origins: Vec<String>,
    /// Reject out-of-range temperature / max_tokens instead of passing them through.
    pub validate_generation_params: bool
}

impl Config {

    pub fn from_env() -> Result<Self, ConfigError> {

        Self::from_lookup(|name| std::env::var(name).ok())

    }

    // split out so tests don't have to touch the real process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>
    {

        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let openai_api_key = required("OPENAI_API_KEY")?;
        let client_api_key = required("CLIENT_API_KEY")?;

        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            _ => DEFAULT_PORT
        };

        let openai_base_url = lookup("OPENAI_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) if !raw.trim().is_empty() => parse_origins(&raw)?,
            _ => DEFAULT_ALLOWED_ORIGINS.iter().map(|origin| origin.to_string()).collect()
        };

        let validate_generation_params = match lookup("VALIDATE_GENERATION_PARAMS") {
            None => false,
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "" | "0" | "false" | "no" => false,
                "1" | "true" | "yes" => true,
                _ => return Err(ConfigError::InvalidFlag(raw))
            }
        };

        Ok(Config {
            openai_api_key,
            client_api_key,
            port,
            openai_base_url,
            allowed_origins,
            validate_generation_params
        })

    }

}

/// Splits a comma separated origin list.
///
/// Browsers send `Origin` without a trailing slash, so it is stripped here.
/// Wildcards are refused because credentialed CORS needs explicit origins.
pub fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {

    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            if is_valid_origin(origin) {
                Ok(origin.to_string())
            } else {
                Err(ConfigError::InvalidOrigin(origin.to_string()))
            }
        })
        .collect()

}

pub fn is_valid_origin(origin: &str) -> bool {

    origin != "*"
        && !origin.contains('*')
        && origin.contains("://")
        && HeaderValue::from_str(origin).is_ok()

}
