/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - config, token 検証, user 解決, wallet 読み出し
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::repos::user_repo::UserDirectory;
use crate::repos::wallet_repo::WalletLedger;
use crate::services::auth_token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserDirectory>,
    pub wallet: Arc<dyn WalletLedger>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        tokens: Arc<TokenService>,
        users: Arc<dyn UserDirectory>,
        wallet: Arc<dyn WalletLedger>,
    ) -> Self {
        Self {
            config,
            tokens,
            users,
            wallet,
        }
    }
}
