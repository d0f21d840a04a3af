/*
 * Responsibility
 * - ブラウザ向け HTML ページ (/, /login, /wallet, /payment)
 * - 静的な HTML をそのまま返す (データは各ページが /api から取得する)
 */
use axum::{Router, response::Html, routing::get};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/wallet", get(wallet))
        .route("/payment", get(payment))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

async fn login() -> Html<&'static str> {
    Html(include_str!("../../templates/login.html"))
}

async fn wallet() -> Html<&'static str> {
    Html(include_str!("../../templates/wallet.html"))
}

async fn payment() -> Html<&'static str> {
    Html(include_str!("../../templates/accept_payment.html"))
}
