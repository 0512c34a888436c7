use std::time::Duration;

use thiserror::Error;
use url::Url;

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
    // Content repository
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub store_timeout: Duration,

    // Listing
    pub page_size: u32,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub revalidate: Duration,

    // Comments
    pub comments: Option<CommentsConfig>,
}

/// Utterances comment widget settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsConfig {
    /// GitHub repository in `owner/name` form that stores the comment issues.
    pub repo: String,
    pub issue_term: String,
    pub label: String,
    pub theme: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let comments = optional_env("UTTERANCES_REPO").map(|repo| CommentsConfig {
            repo,
            issue_term: env_or_default("UTTERANCES_ISSUE_TERM", "pathname"),
            label: env_or_default("UTTERANCES_LABEL", "comments"),
            theme: env_or_default("UTTERANCES_THEME", "github-dark"),
        });

        Ok(Self {
            // Content repository
            api_endpoint: required_env("PRISMIC_API_ENDPOINT")?,
            access_token: optional_env("PRISMIC_TOKEN"),
            store_timeout: Duration::from_secs(parse_env_u64("STORE_TIMEOUT_SECS", 10)?),

            // Listing
            page_size: parse_env_u32("PAGE_SIZE", 2)?,

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,
            revalidate: Duration::from_secs(parse_env_u64("REVALIDATE_SECS", 1800)?),

            comments,
        })
    }

    /// Configuration with sensible defaults for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_endpoint: "http://127.0.0.1:9/api/v2".to_string(),
            access_token: None,
            store_timeout: Duration::from_secs(5),
            page_size: 2,
            web_host: "127.0.0.1".to_string(),
            web_port: 3000,
            revalidate: Duration::ZERO,
            comments: None,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "PRISMIC_API_ENDPOINT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        match Url::parse(&self.api_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    name: "PRISMIC_API_ENDPOINT".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    name: "PRISMIC_API_ENDPOINT".to_string(),
                    message: e.to_string(),
                });
            }
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_SIZE".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "STORE_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
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
