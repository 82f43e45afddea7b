//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::models::UserRow;

/// User repository trait.
///
/// The identity resolver is the only authentication-path writer; resource
/// handlers read through this trait but never upsert users themselves.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by local id
    async fn find_by_id(&self, id: i32) -> DbResult<Option<UserRow>>;

    /// Find a user by Telegram id
    async fn find_by_telegram_id(&self, telegram_id: i64) -> DbResult<Option<UserRow>>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> DbResult<UserRow>;

    /// Overwrite display name and (when `Some`) avatar, bumping `updated_at`
    async fn update_profile(&self, id: i32, name: &str, avatar: Option<&str>) -> DbResult<()>;
}

/// Create user input
#[derive(Debug, Clone)]
pub struct NewUser {
    pub telegram_id: i64,
    pub name: String,
    pub avatar: Option<String>,
}
