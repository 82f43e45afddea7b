//! Configuration for launch-payload authentication

use std::time::Duration;

/// Auth configuration.
///
/// Built once at startup and handed to the verifier and resolver at
/// construction time; nothing in the auth path reads the environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Telegram bot token used as the HMAC shared secret. Absent means the
    /// hash scheme is never attempted and such payloads fail closed.
    pub bot_secret: Option<String>,
    /// Allow the placeholder identity when no payload is supplied at all.
    /// Development only; production must keep this off.
    pub allow_dev_fallback: bool,
    /// Telegram id of the placeholder identity used by the dev fallback.
    pub mock_telegram_id: i64,
    /// Replay window for the detached-signature scheme.
    pub max_payload_age: Duration,
}

impl AuthConfig {
    /// Create a config with production defaults (no secret, no fallback)
    pub fn new() -> Self {
        Self {
            bot_secret: None,
            allow_dev_fallback: false,
            mock_telegram_id: 123_456_789,
            max_payload_age: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Set the bot token used as the HMAC shared secret
    pub fn with_bot_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.bot_secret = if secret.is_empty() { None } else { Some(secret) };
        self
    }

    /// Enable or disable the development fallback identity
    pub fn with_dev_fallback(mut self, allow: bool) -> Self {
        self.allow_dev_fallback = allow;
        self
    }

    /// Set the Telegram id of the placeholder identity
    pub fn with_mock_telegram_id(mut self, id: i64) -> Self {
        self.mock_telegram_id = id;
        self
    }

    /// Set the replay window for the detached-signature scheme
    pub fn with_max_payload_age(mut self, age: Duration) -> Self {
        self.max_payload_age = age;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
