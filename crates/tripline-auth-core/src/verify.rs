//! Signature Verifier for launch payloads
//!
//! Decides which verification scheme applies to an `initData` blob, checks
//! authenticity and freshness, and returns a verdict. Pure over its inputs
//! plus the clock: only the detached-signature path reads wall time, and the
//! HMAC path is fully deterministic.

use chrono::{DateTime, Utc};

use crate::config::AuthConfig;
use crate::crypto::{constant_time_hex_eq, init_data_hash};
use crate::payload::{InitData, AUTH_DATE_FIELD, USER_FIELD};

/// Hex length of a 64-byte detached signature
const SIGNATURE_HEX_LEN: usize = 128;

/// Which verification scheme was selected for a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Keyed HMAC-SHA256 over the data-check string (requires a secret)
    HashBased,
    /// Detached 64-byte signature; structural and freshness checks only
    SignatureBased,
    /// Neither authenticity field is usable
    Unsupported,
}

/// Why a payload was rejected. Diagnostics only: callers log these but must
/// never branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyPayload,
    MalformedPayload,
    UnsupportedScheme,
    HashMismatch,
    MalformedSignature,
    MissingUserField,
    MissingAuthDate,
    UnparsableAuthDate,
    StalePayload,
}

impl RejectReason {
    /// Machine-readable code for logs and 401 bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyPayload => "EMPTY_PAYLOAD",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            Self::HashMismatch => "SIGNATURE_MISMATCH",
            Self::MalformedSignature => "SIGNATURE_MISMATCH",
            Self::MissingUserField => "MALFORMED_PAYLOAD",
            Self::MissingAuthDate => "MALFORMED_PAYLOAD",
            Self::UnparsableAuthDate => "MALFORMED_PAYLOAD",
            Self::StalePayload => "STALE_PAYLOAD",
        }
    }
}

/// Outcome of verifying one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    /// The verdict. Nothing else in this struct may alter control flow.
    pub valid: bool,
    /// Scheme that was selected for the payload
    pub scheme: Scheme,
    /// Present exactly when `valid` is false
    pub reason: Option<RejectReason>,
}

impl VerificationResult {
    fn ok(scheme: Scheme) -> Self {
        Self {
            valid: true,
            scheme,
            reason: None,
        }
    }

    fn rejected(scheme: Scheme, reason: RejectReason) -> Self {
        Self {
            valid: false,
            scheme,
            reason: Some(reason),
        }
    }
}

/// Verifies launch payloads against the configured shared secret.
///
/// Never panics and never returns an error: every internal failure folds into
/// `valid = false` with a diagnostic reason.
#[derive(Debug, Clone)]
pub struct InitDataVerifier {
    bot_secret: Option<String>,
    max_age: chrono::Duration,
}

impl InitDataVerifier {
    /// Create a verifier from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        let max_age = chrono::Duration::from_std(config.max_payload_age)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        Self {
            bot_secret: config.bot_secret.clone(),
            max_age,
        }
    }

    /// Verify a raw payload against the current wall clock
    pub fn verify(&self, init_data: &str) -> VerificationResult {
        self.verify_at(init_data, Utc::now())
    }

    /// Verify a raw payload at an explicit instant. The clock only matters
    /// for the detached-signature freshness check.
    pub fn verify_at(&self, init_data: &str, now: DateTime<Utc>) -> VerificationResult {
        if init_data.is_empty() {
            return VerificationResult::rejected(Scheme::Unsupported, RejectReason::EmptyPayload);
        }

        let data = match InitData::parse(init_data) {
            Ok(data) => data,
            Err(err) => {
                tracing::debug!(error = %err, "launch payload failed to parse");
                return VerificationResult::rejected(
                    Scheme::Unsupported,
                    RejectReason::MalformedPayload,
                );
            }
        };

        // Scheme selection, resolved exactly once per payload. The keyed hash
        // is preferred whenever it is checkable: it is the only scheme that
        // actually proves authenticity.
        match (data.hash(), &self.bot_secret) {
            (Some(hash), Some(secret)) => self.verify_hash(&data, hash, secret),
            _ => match data.signature() {
                Some(signature) => self.verify_signature(&data, signature, now),
                None => {
                    tracing::debug!(
                        has_hash = data.hash().is_some(),
                        has_secret = self.bot_secret.is_some(),
                        "no usable verification scheme for payload"
                    );
                    VerificationResult::rejected(
                        Scheme::Unsupported,
                        RejectReason::UnsupportedScheme,
                    )
                }
            },
        }
    }

    /// Keyed-hash scheme: recompute the HMAC over the data-check string under
    /// the derived secret and compare constant-time.
    fn verify_hash(&self, data: &InitData, hash: &str, secret: &str) -> VerificationResult {
        let check_string = data.check_string();
        let computed = init_data_hash(secret, &check_string);

        if constant_time_hex_eq(&computed, hash) {
            VerificationResult::ok(Scheme::HashBased)
        } else {
            tracing::debug!("launch payload hash mismatch");
            VerificationResult::rejected(Scheme::HashBased, RejectReason::HashMismatch)
        }
    }

    /// Detached-signature scheme: shape and freshness checks only. The
    /// 64-byte signature is not verified against Telegram's public key; see
    /// DESIGN.md for the tradeoff.
    fn verify_signature(
        &self,
        data: &InitData,
        signature: &str,
        now: DateTime<Utc>,
    ) -> VerificationResult {
        let scheme = Scheme::SignatureBased;

        if signature.len() != SIGNATURE_HEX_LEN
            || !signature.chars().all(|c| c.is_ascii_hexdigit())
        {
            tracing::debug!(len = signature.len(), "malformed detached signature");
            return VerificationResult::rejected(scheme, RejectReason::MalformedSignature);
        }

        if data.get(USER_FIELD).is_none() {
            return VerificationResult::rejected(scheme, RejectReason::MissingUserField);
        }

        let auth_date = match data.get(AUTH_DATE_FIELD) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(ts) => ts,
                Err(_) => {
                    return VerificationResult::rejected(scheme, RejectReason::UnparsableAuthDate)
                }
            },
            None => return VerificationResult::rejected(scheme, RejectReason::MissingAuthDate),
        };

        // Saturating keeps hostile timestamps (e.g. i64::MIN) from wrapping
        // the age negative and sliding past the staleness check.
        let age = now.timestamp().saturating_sub(auth_date);
        if age > self.max_age.num_seconds() {
            tracing::debug!(age_secs = age, "launch payload outside replay window");
            return VerificationResult::rejected(scheme, RejectReason::StalePayload);
        }

        VerificationResult::ok(scheme)
    }
}
