/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - login_required: token 検証 → CurrentUser (保護 route のみ)
 *   - http / cors: 全 route 共通の transport 関心事
 */
pub mod cors;
pub mod http;
pub mod login_required;
