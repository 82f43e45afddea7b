//! Database connection pool

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Pool ceiling per service instance; each authenticated request performs at
/// most one short upsert plus the handler's own reads.
const MAX_CONNECTIONS: u32 = 10;

/// Acquire must give up well inside the ambient request deadline.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool with the service defaults
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}
