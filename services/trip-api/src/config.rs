//! Configuration for the Trip API service.

use tripline_auth_core::AuthConfig;

/// Trip API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Development mode: skips payload verification and substitutes the
    /// placeholder identity when no payload is supplied
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Bot token used as the HMAC shared secret. Deliberately optional: a
        // missing secret degrades hash-scheme payloads to 401, never to a
        // startup failure.
        let bot_secret = std::env::var("TELEGRAM_BOT_SECRET").unwrap_or_default();

        // Development mode
        let dev_mode = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        let mock_telegram_id: i64 = std::env::var("DEV_MOCK_TELEGRAM_ID")
            .unwrap_or_else(|_| "123456789".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DEV_MOCK_TELEGRAM_ID"))?;

        let auth = AuthConfig::new()
            .with_bot_secret(bot_secret)
            .with_dev_fallback(dev_mode)
            .with_mock_telegram_id(mock_telegram_id);

        Ok(Self {
            http_port,
            database_url,
            auth,
            dev_mode,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
