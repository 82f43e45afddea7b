//! Axum extractors for authentication

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use tripline_types::{Principal, TelegramId, UserId};

use crate::error::{ErrorDetail, ErrorResponse};

/// Authenticated user extracted from the request.
///
/// Wraps the principal the auth middleware attached to the request; handlers
/// must base membership and ownership checks on these two ids only.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    /// Local user id
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Telegram id the local user is bound to
    pub fn telegram_id(&self) -> TelegramId {
        self.0.telegram_id
    }
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message.to_string(),
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(CurrentUser)
            .ok_or(AuthRejection {
                status: StatusCode::UNAUTHORIZED,
                code: "UNAUTHENTICATED",
                message: "No authenticated user on this request",
            })
    }
}
