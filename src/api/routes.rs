/*
 * Responsibility
 * - /api の URL 構造を定義
 * - login_required が必要な範囲を route_layer で適用するのもここ
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    api::handlers::{
        dev::issue_token, home::home, payment::payment_config, users::me,
        wallet::list_transactions,
    },
    middleware::login_required,
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/", get(home))
        .route("/api/dev/token", post(issue_token));

    let protected = Router::new()
        .route("/api/user/me", get(me))
        .route("/api/wallet/transactions", get(list_transactions))
        .route("/api/payment/config", get(payment_config));

    public.merge(login_required::apply(protected, state))
}
