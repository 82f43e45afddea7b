//! Auth errors

use thiserror::Error;

/// Authentication errors.
///
/// Every variant folds into a 401 for the caller: this subsystem fails
/// closed, and neither misconfiguration nor storage trouble may surface as a
/// 500 on the authentication path.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Payload structure could not be parsed
    #[error("malformed launch payload")]
    MalformedPayload,

    /// Authenticity check failed (hash or signature)
    #[error("signature verification failed")]
    SignatureMismatch,

    /// No verification scheme applies (no hash+secret, no signature)
    #[error("no supported verification scheme")]
    UnsupportedScheme,

    /// Payload older than the replay window
    #[error("launch payload too old")]
    StalePayload,

    /// The `user` field does not decode to a usable identity claim
    #[error("unrecognized identity claim")]
    UnknownClaim,

    /// No payload supplied and no fallback allowed
    #[error("unauthenticated")]
    Unauthenticated,

    /// User storage failed while establishing the principal
    #[error("storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// HTTP status for this error. Always a 401-class response.
    pub fn status_code(&self) -> u16 {
        401
    }

    /// Machine-readable reason code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::UnsupportedScheme => "UNSUPPORTED_SCHEME",
            Self::StalePayload => "STALE_PAYLOAD",
            Self::UnknownClaim => "UNKNOWN_CLAIM",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

impl From<tripline_db::DbError> for AuthError {
    fn from(err: tripline_db::DbError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::Storage(err.to_string())
    }
}
