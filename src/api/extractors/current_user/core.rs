use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::CurrentUser;

/// Handler で CurrentUser を受け取るための extractor
/// middleware が CurrentUser を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (login_required が掛かっていない route)
pub struct AuthUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
