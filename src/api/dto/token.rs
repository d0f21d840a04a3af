/*
 * Responsibility
 * - dev token 発行の request/response DTO
 * - request は RequestParser の Namespace から deserialize する
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub user_id: String, // UUID (users.userId)
    pub parameter: Option<Value>,
    pub ttl_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}
