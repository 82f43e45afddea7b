//! Mock user repository for testing

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

use tripline_db::{DbError, DbResult, NewUser, UserRepository, UserRow};

/// In-memory user repository enforcing the Telegram-id unique constraint
#[derive(Default)]
pub struct MockUserRepository {
    users: Arc<DashMap<i32, UserRow>>,
    by_telegram_id: Arc<DashMap<i64, i32>>,
    next_id: AtomicI32,
    /// When set, `update_profile` fails with a storage error
    pub fail_updates: AtomicBool,
    /// When set, the next `find_by_telegram_id` misses once, simulating a
    /// racing insert landing between a caller's find and create
    pub suppress_next_find: AtomicBool,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }

    /// Insert a row directly, bypassing the repository contract
    pub fn insert_user(&self, row: UserRow) {
        self.by_telegram_id.insert(row.telegram_id, row.id);
        self.users.insert(row.id, row);
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn get_by_telegram_id(&self, telegram_id: i64) -> Option<UserRow> {
        self.by_telegram_id
            .get(&telegram_id)
            .and_then(|id| self.users.get(id.value()).map(|r| r.value().clone()))
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: i32) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> DbResult<Option<UserRow>> {
        if self.suppress_next_find.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.get_by_telegram_id(telegram_id))
    }

    async fn create(&self, user: NewUser) -> DbResult<UserRow> {
        if self.by_telegram_id.contains_key(&user.telegram_id) {
            return Err(DbError::UniqueViolation);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = UserRow {
            id,
            telegram_id: user.telegram_id,
            name: user.name,
            avatar: user.avatar,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.insert_user(row.clone());
        Ok(row)
    }

    async fn update_profile(&self, id: i32, name: &str, avatar: Option<&str>) -> DbResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DbError::NotFound);
        }
        if let Some(mut user) = self.users.get_mut(&id) {
            user.name = name.to_string();
            if let Some(avatar) = avatar {
                user.avatar = Some(avatar.to_string());
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}
