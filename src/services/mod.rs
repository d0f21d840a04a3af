/*
 * Responsibility
 * - handler / middleware から呼ばれるロジック
 *   - auth_token: token の発行/検証
 *   - cookie: token cookie の読み書き
 *   - request_parser: 引数宣言 → 検証済み Namespace
 *   - pagination: count + fetch → Page
 *   - url: CDN URL の正規化
 */
pub mod auth_token;
pub mod cookie;
pub mod pagination;
pub mod request_parser;
pub mod url;
