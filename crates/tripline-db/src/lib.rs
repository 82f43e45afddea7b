//! Tripline DB - Database abstractions
//!
//! SQLx-based database layer for Tripline services.
//!
//! # Example
//!
//! ```rust,ignore
//! use tripline_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/tripline").await?;
//! let repos = Repositories::new(pool);
//!
//! let user = repos.users.find_by_telegram_id(42).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
