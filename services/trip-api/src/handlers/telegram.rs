//! Launch-payload validation endpoint
//!
//! Lets the Mini App frontend check its own `initData` before making
//! authenticated calls. This path sits on the auth middleware's allowlist,
//! so it never requires a principal.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use tripline_auth_core::{AuthError, IdentityClaim, InitData};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub init_data: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<IdentityClaim>,
}

/// POST /api/telegram/validate
///
/// Verify a launch payload and echo back the identity claim it carries.
pub async fn validate_init_data(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> ApiResult<Json<ValidateResponse>> {
    if req.init_data.is_empty() {
        return Err(ApiError::BadRequest("init_data is required".to_string()));
    }

    // Development mode skips verification, same as the middleware
    let valid = state.config.dev_mode || state.verifier.verify(&req.init_data).valid;
    if !valid {
        return Err(ApiError::Auth(AuthError::SignatureMismatch));
    }

    let user = InitData::parse(&req.init_data)
        .ok()
        .and_then(|data| data.identity_claim());

    Ok(Json(ValidateResponse { valid: true, user }))
}
