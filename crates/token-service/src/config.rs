use common::config::{LogFormat, ObservabilityConfig};
use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default lifetime of media tokens (1 hour).
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 3600;

/// Default lifetime of the privileges inside media tokens (1 hour).
pub const DEFAULT_PRIVILEGE_EXPIRE_SECONDS: i64 = 3600;

/// Default lifetime of messaging tokens (24 hours).
pub const DEFAULT_CHAT_TOKEN_EXPIRE_SECONDS: i64 = 86_400;

/// Upper bound for any configured lifetime (24 hours).
pub const MAX_EXPIRE_SECONDS: i64 = 86_400;

/// Channel used as the scope of messaging tokens when none is configured.
pub const DEFAULT_CHAT_APP_KEY: &str = "chatchill";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_LOG_FILTER: &str = "token_service=debug,tower_http=debug";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Application identity written into every token as the issuer.
    pub app_id: String,
    /// Shared secret keying the token HMAC. Never logged.
    pub app_certificate: SecretString,
    pub token_expire_seconds: i64,
    pub privilege_expire_seconds: i64,
    pub chat_token_expire_seconds: i64,
    /// Channel scope for messaging tokens.
    pub chat_app_key: String,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Environment variable {0} must not be empty")]
    EmptyValue(String),

    #[error("Invalid expiry for {name}: {reason}")]
    InvalidExpiry { name: String, reason: String },

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let app_id = required_non_empty(vars, "RTC_APP_ID")?;
        let app_certificate = SecretString::from(required_non_empty(vars, "RTC_APP_CERTIFICATE")?);

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let token_expire_seconds =
            parse_expiry(vars, "TOKEN_EXPIRE_SECONDS", DEFAULT_TOKEN_EXPIRE_SECONDS)?;
        let privilege_expire_seconds = parse_expiry(
            vars,
            "PRIVILEGE_EXPIRE_SECONDS",
            DEFAULT_PRIVILEGE_EXPIRE_SECONDS,
        )?;
        let chat_token_expire_seconds = parse_expiry(
            vars,
            "CHAT_TOKEN_EXPIRE_SECONDS",
            DEFAULT_CHAT_TOKEN_EXPIRE_SECONDS,
        )?;

        let chat_app_key = match vars.get("CHAT_APP_KEY") {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("CHAT_APP_KEY".to_string()))
            }
            Some(value) => value.clone(),
            None => DEFAULT_CHAT_APP_KEY.to_string(),
        };

        let log_format = match vars.get("LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(ConfigError::InvalidLogFormat)?,
            None => LogFormat::default(),
        };

        Ok(Config {
            bind_address,
            app_id,
            app_certificate,
            token_expire_seconds,
            privilege_expire_seconds,
            chat_token_expire_seconds,
            chat_app_key,
            observability: ObservabilityConfig {
                log_filter: DEFAULT_LOG_FILTER.to_string(),
                log_format,
            },
        })
    }
}

fn required_non_empty(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    let value = vars
        .get(name)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;

    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue(name.to_string()));
    }

    Ok(value.clone())
}

/// Parse an expiry in seconds, enforcing `1..=MAX_EXPIRE_SECONDS`.
fn parse_expiry(
    vars: &HashMap<String, String>,
    name: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    let Some(raw) = vars.get(name) else {
        return Ok(default);
    };

    let seconds = raw
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidExpiry {
            name: name.to_string(),
            reason: format!("not an integer ({e})"),
        })?;

    if !(1..=MAX_EXPIRE_SECONDS).contains(&seconds) {
        return Err(ConfigError::InvalidExpiry {
            name: name.to_string(),
            reason: format!("must be between 1 and {MAX_EXPIRE_SECONDS}, got {seconds}"),
        });
    }

    Ok(seconds)
}
