//! Current-user handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use tripline_db::UserRepository;

use crate::error::{ApiError, ApiResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub telegram_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// GET /api/me
///
/// Return the profile of the authenticated user.
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Json<MeResponse>> {
    let row = state
        .repos
        .users
        .find_by_id(user.user_id().0)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(MeResponse {
        id: row.id,
        telegram_id: row.telegram_id,
        name: row.name,
        avatar: row.avatar,
    }))
}
