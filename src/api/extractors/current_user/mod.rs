/*!
 * Authenticated user extractor
 *
 * Responsibility:
 * - 認証済みリクエストのユーザー (CurrentUser) を handler に提供する
 * - axum 依存は core に閉じ込め、型定義は types に分離する
 */

mod core;
mod types;

pub use self::core::AuthUser;
pub use self::types::CurrentUser;
