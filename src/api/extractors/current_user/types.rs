/*
 * Responsibility
 * - Handler から見える「認証済みユーザー」の型
 * - login_required middleware が token を検証して request extensions に格納し、
 *   handler はこの型だけを受け取る
 */
use serde_json::Value;

use crate::repos::user_repo::UserRow;

/// Identity attached to an authenticated request.
///
/// - `user` is the row the token's subject resolved to
/// - `token_parameter` is whatever was embedded in the token at issue time
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserRow,
    pub token_parameter: Option<Value>,
}
