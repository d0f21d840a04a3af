/*
 * Responsibility
 * - Users の response DTO
 * - avatar_url は CDN で正規化済みの値を返す
 */
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::repos::user_repo::UserRow;
use crate::services::url::url_normalize;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub avatar_url: String,
    pub token_parameter: Option<Value>,
}

impl UserResponse {
    pub fn new(row: UserRow, token_parameter: Option<Value>, cdn_base: &str) -> Self {
        Self {
            id: row.id,
            avatar_url: url_normalize(row.image_url.as_deref().unwrap_or_default(), cdn_base),
            user_name: row.user_name,
            token_parameter,
        }
    }
}
