use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content source
    pub prismic_api_endpoint: String,
    pub prismic_access_token: Option<String>,
    pub document_type: String,
    pub http_timeout: Duration,

    // Page generation
    pub home_page_size: u32,
    pub prerender_page_size: u32,
    pub revalidate_after: Duration,
    pub listing_session_idle: Duration,

    // Web Server
    pub site_name: String,
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Content source
            prismic_api_endpoint: required_env("PRISMIC_API_ENDPOINT")?,
            prismic_access_token: optional_env("PRISMIC_ACCESS_TOKEN"),
            document_type: env_or_default("DOCUMENT_TYPE", "posts"),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Page generation
            home_page_size: parse_env_u32("HOME_PAGE_SIZE", 5)?,
            prerender_page_size: parse_env_u32("PRERENDER_PAGE_SIZE", 20)?,
            revalidate_after: Duration::from_secs(parse_env_u64("REVALIDATE_SECS", 60 * 30)?),
            listing_session_idle: Duration::from_secs(parse_env_u64(
                "LISTING_SESSION_IDLE_SECS",
                60 * 30,
            )?),

            // Web Server
            site_name: env_or_default("SITE_NAME", "spacetraveling"),
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
        })
    }

    /// Configuration pointing at the given endpoint with every other value at
    /// its default. Used by tests and tools that don't read the environment.
    #[must_use]
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            prismic_api_endpoint: endpoint.into(),
            prismic_access_token: None,
            document_type: "posts".to_string(),
            http_timeout: Duration::from_secs(30),
            home_page_size: 5,
            prerender_page_size: 20,
            revalidate_after: Duration::from_secs(60 * 30),
            listing_session_idle: Duration::from_secs(60 * 30),
            site_name: "spacetraveling".to_string(),
            web_host: "127.0.0.1".to_string(),
            web_port: 8080,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prismic_api_endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "PRISMIC_API_ENDPOINT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.prismic_api_endpoint) {
            return Err(ConfigError::InvalidValue {
                name: "PRISMIC_API_ENDPOINT".to_string(),
                message: format!("not a valid URL: {e}"),
            });
        }
        if self.document_type.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "DOCUMENT_TYPE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        // Prismic caps pageSize at 100
        for (name, value) in [
            ("HOME_PAGE_SIZE", self.home_page_size),
            ("PRERENDER_PAGE_SIZE", self.prerender_page_size),
        ] {
            if value == 0 || value > 100 {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: format!("must be between 1 and 100, got {value}"),
                });
            }
        }
        for (name, value) in [
            ("REVALIDATE_SECS", self.revalidate_after),
            ("LISTING_SESSION_IDLE_SECS", self.listing_session_idle),
            ("HTTP_TIMEOUT_SECS", self.http_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}
