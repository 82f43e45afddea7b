//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique constraint violation.
    ///
    /// Racing first-sight inserts for the same Telegram id surface here; the
    /// caller re-reads and attaches to the winning row instead of failing.
    #[error("unique constraint violation")]
    UniqueViolation,
}

impl DbError {
    /// Fold a SQLx error, mapping Postgres unique violations (23505) to
    /// [`DbError::UniqueViolation`]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some("23505") {
                return Self::UniqueViolation;
            }
        }
        Self::Sqlx(err)
    }

    /// True if this error is a unique-constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation)
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
