//! User identity types

use serde::{Deserialize, Serialize};

/// Local user identifier (primary key in the users table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i32);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Telegram user identifier (the only remote field trusted as a stable key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TelegramId(pub i64);

impl std::fmt::Display for TelegramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TelegramId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Request-scoped security principal.
///
/// Created fresh for every authenticated request and attached to the request
/// extensions; never cached across requests or persisted. Downstream handlers
/// must base authorization decisions on these two ids and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Local user id (users table primary key)
    pub user_id: UserId,
    /// Telegram user id the local record is bound to
    pub telegram_id: TelegramId,
}

impl Principal {
    /// Create a new principal
    pub fn new(user_id: UserId, telegram_id: TelegramId) -> Self {
        Self {
            user_id,
            telegram_id,
        }
    }
}
