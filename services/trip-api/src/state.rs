//! Application state

use std::ops::Deref;
use std::sync::Arc;

use tripline_auth_core::{IdentityResolver, InitDataVerifier};
use tripline_db::pg::{PgUserRepository, Repositories};
use tripline_db::DbPool;

use crate::config::Config;

/// Type alias for the resolver with the concrete repository type
pub type IdentityResolverImpl = IdentityResolver<PgUserRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Launch-payload verifier
    pub verifier: Arc<InitDataVerifier>,
    /// Identity resolver binding payloads to principals
    pub resolver: Arc<IdentityResolverImpl>,
    /// Database repositories
    pub repos: Repositories,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(repos: Repositories, pool: DbPool, config: Config) -> Self {
        let verifier = InitDataVerifier::new(&config.auth);
        let resolver =
            IdentityResolver::new(config.auth.clone(), Arc::new(repos.users.clone()));

        Self {
            verifier: Arc::new(verifier),
            resolver: Arc::new(resolver),
            repos,
            pool: SharedPool(Arc::new(pool)),
            config: Arc::new(config),
        }
    }
}
