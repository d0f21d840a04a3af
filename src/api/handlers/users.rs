/*
 * Responsibility
 * - /api/user 系 handler (login_required の内側)
 */
use axum::{Json, extract::State};

use crate::{
    api::{dto::users::UserResponse, extractors::AuthUser},
    state::AppState,
};

pub async fn me(State(state): State<AppState>, AuthUser(current): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::new(
        current.user,
        current.token_parameter,
        &state.config.oss_bucket_cdn,
    ))
}
