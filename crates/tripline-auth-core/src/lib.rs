//! Tripline Auth Core - launch-payload authentication
//!
//! Verifies the signed `initData` blob a Telegram Mini App hands to the
//! backend and maps the embedded identity claim onto a local user record,
//! producing the request-scoped [`Principal`](tripline_types::Principal)
//! every downstream authorization check consumes.
//!
//! Two halves:
//! - [`InitDataVerifier`] decides which verification scheme applies
//!   (HMAC-SHA256 hash or detached Ed25519-style signature), checks
//!   authenticity and freshness, and returns a verdict with diagnostics.
//! - [`IdentityResolver`] extracts the identity claim from a verified
//!   payload and upserts the corresponding user row.

pub mod config;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod resolver;
pub mod verify;

pub use config::AuthConfig;
pub use error::AuthError;
pub use payload::{IdentityClaim, InitData, PayloadError};
pub use resolver::IdentityResolver;
pub use verify::{InitDataVerifier, RejectReason, Scheme, VerificationResult};
