//! Identity Resolver / Principal Binder
//!
//! Takes a verified (or, in development mode, deliberately unverified)
//! launch payload, reconciles the embedded identity claim against user
//! storage, and emits the request-scoped [`Principal`]. This is the only
//! authentication-path writer to the users table.

use std::sync::Arc;

use tripline_db::{NewUser, UserRepository};
use tripline_types::Principal;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::payload::{IdentityClaim, InitData};

/// Display name given to the development placeholder identity
const FALLBACK_NAME: &str = "Test User";

/// Resolves identity claims to local user records.
pub struct IdentityResolver<U: UserRepository> {
    config: AuthConfig,
    users: Arc<U>,
}

impl<U: UserRepository> IdentityResolver<U> {
    /// Create a new resolver
    pub fn new(config: AuthConfig, users: Arc<U>) -> Self {
        Self { config, users }
    }

    /// Resolve a launch payload into a principal.
    ///
    /// `verified` is the Signature Verifier's verdict for this payload. An
    /// unverified non-empty payload is always rejected; there is no
    /// accept-on-parse path. One shot per request, no retries beyond the
    /// first-sight race below.
    pub async fn resolve(&self, init_data: &str, verified: bool) -> Result<Principal, AuthError> {
        if init_data.is_empty() {
            if self.config.allow_dev_fallback {
                return self.resolve_fallback().await;
            }
            return Err(AuthError::Unauthenticated);
        }

        if !verified {
            tracing::warn!("rejecting launch payload that failed verification");
            return Err(AuthError::SignatureMismatch);
        }

        let data = InitData::parse(init_data).map_err(|err| {
            tracing::debug!(error = %err, "verified payload failed to re-parse");
            AuthError::MalformedPayload
        })?;

        let claim = data.identity_claim().ok_or(AuthError::UnknownClaim)?;
        if claim.id <= 0 {
            return Err(AuthError::UnknownClaim);
        }

        self.upsert(&claim).await
    }

    /// Upsert the user row for a claim and bind the principal.
    ///
    /// Every authenticated request re-writes display metadata so the local
    /// profile tracks upstream changes.
    async fn upsert(&self, claim: &IdentityClaim) -> Result<Principal, AuthError> {
        let name = claim.display_name();

        match self.users.find_by_telegram_id(claim.id).await? {
            Some(row) => {
                // Profile refresh failure is not fatal: the row is already
                // loaded, so the principal can still be issued from it.
                if let Err(err) = self
                    .users
                    .update_profile(row.id, &name, claim.avatar())
                    .await
                {
                    tracing::warn!(
                        error = %err,
                        telegram_id = claim.id,
                        "failed to refresh user profile"
                    );
                }
                Ok(row.principal())
            }
            None => {
                let new_user = NewUser {
                    telegram_id: claim.id,
                    name,
                    avatar: claim.avatar().map(String::from),
                };
                self.create_user(new_user).await
            }
        }
    }

    /// Insert a first-sight user, attaching to the winning row when a racing
    /// request inserted the same Telegram id in between.
    async fn create_user(&self, new_user: NewUser) -> Result<Principal, AuthError> {
        let telegram_id = new_user.telegram_id;

        match self.users.create(new_user).await {
            Ok(row) => {
                tracing::info!(telegram_id, user_id = row.id, "created user on first sight");
                Ok(row.principal())
            }
            Err(err) if err.is_unique_violation() => {
                tracing::debug!(telegram_id, "lost first-sight insert race, re-reading");
                let row = self
                    .users
                    .find_by_telegram_id(telegram_id)
                    .await?
                    .ok_or_else(|| {
                        AuthError::Storage("user row missing after unique violation".to_string())
                    })?;
                Ok(row.principal())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve the development placeholder identity (no payload supplied).
    async fn resolve_fallback(&self) -> Result<Principal, AuthError> {
        let telegram_id = self.config.mock_telegram_id;

        if let Some(row) = self.users.find_by_telegram_id(telegram_id).await? {
            return Ok(row.principal());
        }

        self.create_user(NewUser {
            telegram_id,
            name: FALLBACK_NAME.to_string(),
            avatar: None,
        })
        .await
    }
}

impl<U: UserRepository> std::fmt::Debug for IdentityResolver<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
