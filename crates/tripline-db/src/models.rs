//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tripline_types::{Principal, TelegramId, UserId};

/// User row from the database.
///
/// `telegram_id` carries a unique constraint: at most one local user exists
/// per Telegram identity.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub telegram_id: i64,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Convert to domain TelegramId
    pub fn telegram_id(&self) -> TelegramId {
        TelegramId(self.telegram_id)
    }

    /// Build the request-scoped principal for this user
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id(), self.telegram_id())
    }
}
