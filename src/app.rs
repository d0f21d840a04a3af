/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool, TokenService, UserDirectory, WalletLedger) → Router 組み立て
 * - Middleware の適用 (login_required は api 側、http/cors はここ)
 * - axum::serve() で起動 (Ctrl-C / SIGTERM で graceful shutdown)
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::{user_repo::PgUserDirectory, wallet_repo::PgWalletLedger},
    services::auth_token::TokenService,
    state::AppState,
    views,
};

fn init_tracing() {
    // RUST_LOG が無ければ既定値
    // Ex:
    // RUST_LOG=info,wallet_web=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting {} in {:?} mode on {}",
        config.product_name,
        config.app_env,
        config.addr
    );
    match &config.cryptopay {
        Some(creds) => tracing::info!(?creds, "payment credentials loaded"),
        None => tracing::warn!("CRYPTOPAY_APP_ID / CRYPTOPAY_APP_KEY not set; payments are disabled"),
    }
    if config.is_dev_or_test_env() {
        tracing::warn!("connected to a dev/test database; /api/dev/token is enabled");
    }

    let state = build_state(config.clone()).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_state(config: Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    let tokens = Arc::new(TokenService::new(
        &config.auth_token_secret,
        config.auth_token_ttl_seconds,
    ));
    let users = Arc::new(PgUserDirectory::new(db.clone()));
    let wallet = Arc::new(PgWalletLedger::new(db));

    Ok(AppState::new(Arc::new(config), tokens, users, wallet))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .merge(views::routes())
        .merge(api::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::repos::user_repo::{UserRow, memory::InMemoryUsers};
    use crate::repos::wallet_repo::memory::InMemoryLedger;
    use crate::test_support::{
        build_state, config_with, state_with, test_config, test_state, transaction, user,
    };

    fn app_for(state: AppState) -> Router {
        let config = state.config.as_ref().clone();
        build_router(state, &config)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec();
        (status, headers, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn signed_in(alice: &UserRow) -> (Router, String) {
        let state = test_state(InMemoryUsers::default().with(alice.clone()));
        let token = state.tokens.issue(alice.id, None, None).unwrap().token;
        (app_for(state), token)
    }

    #[tokio::test]
    async fn api_home_returns_product_name() {
        let (status, _, body) = send(app_for(test_state(InMemoryUsers::default())), get("/api/")).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"product_name": "Test Wallet"}));
    }

    #[tokio::test]
    async fn html_pages_are_served() {
        for path in ["/", "/login", "/wallet", "/payment"] {
            let app = app_for(test_state(InMemoryUsers::default()));
            let (status, headers, body) = send(app, get(path)).await;

            assert_eq!(status, StatusCode::OK, "{path}");
            assert!(
                headers[header::CONTENT_TYPE]
                    .to_str()
                    .unwrap()
                    .starts_with("text/html"),
                "{path}"
            );
            assert!(String::from_utf8(body).unwrap().contains("<html"));
        }
    }

    #[tokio::test]
    async fn me_requires_a_token() {
        let app = app_for(test_state(InMemoryUsers::default()));
        let (status, _, body) = send(app, get("/api/user/me")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn me_returns_identity_with_cdn_avatar() {
        let alice = user("alice");
        let (app, token) = signed_in(&alice);

        let (status, _, body) = send(app, get(&format!("/api/user/me?token={token}"))).await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["user_name"], "alice");
        assert_eq!(body["avatar_url"], "https://cdn.test/avatars/alice.png");
    }

    #[tokio::test]
    async fn transactions_reject_non_positive_per_page() {
        let alice = user("alice");
        let (app, token) = signed_in(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&per_page=0")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 1000);
        assert!(body["message"]["per_page"].is_string());
    }

    #[tokio::test]
    async fn transactions_reject_unknown_query_fields() {
        let alice = user("alice");
        let (app, token) = signed_in(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&sort=asc")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"]["sort"], "unknown argument");
    }

    #[tokio::test]
    async fn transactions_reject_malformed_page() {
        let alice = user("alice");
        let (app, token) = signed_in(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&page=last")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["message"]["page"].is_string());
    }

    #[tokio::test]
    async fn dev_token_is_issued_in_test_env() {
        let alice = user("alice");
        let state = test_state(InMemoryUsers::default().with(alice.clone()));
        let tokens = state.tokens.clone();

        let (status, headers, body) = send(
            app_for(state),
            post_json(
                "/api/dev/token",
                json!({"user_id": alice.id, "parameter": {"order": 7}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        let token = body["token"].as_str().unwrap();
        assert_eq!(body["expires_in"], 300);

        let verified = tokens.verify(token).unwrap();
        assert_eq!(verified.user_id, alice.id);
        assert_eq!(verified.parameter, Some(json!({"order": 7})));

        let cookie = headers[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("token={token};")));
    }

    #[tokio::test]
    async fn dev_token_validates_strictly() {
        let alice = user("alice");
        let app = app_for(test_state(InMemoryUsers::default().with(alice.clone())));

        let (status, _, body) = send(
            app,
            post_json("/api/dev/token", json!({"user_id": alice.id, "admin": true})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"]["admin"], "unknown argument");
    }

    #[tokio::test]
    async fn dev_token_requires_user_id() {
        let app = app_for(test_state(InMemoryUsers::default()));

        let (status, _, body) = send(app, post_json("/api/dev/token", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"]["user_id"], "user_id is required");
    }

    #[tokio::test]
    async fn dev_token_for_unknown_user_is_404() {
        let app = app_for(test_state(InMemoryUsers::default()));

        let (status, _, _) = send(
            app,
            post_json("/api/dev/token", json!({"user_id": uuid::Uuid::new_v4()})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dev_token_is_hidden_outside_dev_and_test() {
        let alice = user("alice");
        let config = config_with(&[("TEST_ENV_DATABASE_URL", "postgres://elsewhere/test")]);
        let app = app_for(state_with(config, InMemoryUsers::default().with(alice.clone())));

        let (status, _, _) =
            send(app, post_json("/api/dev/token", json!({"user_id": alice.id}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_routes_are_404() {
        let app = build_router(test_state(InMemoryUsers::default()), &test_config());
        let (status, _, _) = send(app, get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn wallet_of(alice: &UserRow) -> (Router, String) {
        let bob = Uuid::new_v4();
        let ledger = InMemoryLedger::default()
            .with(alice.id, transaction(1, 500, "USD"))
            .with(alice.id, transaction(2, 250, "EUR"))
            .with(bob, transaction(3, 999, "USD"))
            .with(alice.id, transaction(4, 125, "USD"));
        let state = build_state(
            test_config(),
            InMemoryUsers::default().with(alice.clone()),
            ledger,
        );
        let token = state.tokens.issue(alice.id, None, None).unwrap().token;
        (app_for(state), token)
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn transactions_are_paginated_newest_first() {
        let alice = user("alice");
        let (app, token) = wallet_of(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&per_page=2")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["page"], 1);
        assert_eq!(body["per_page"], 2);
        assert_eq!(body["total_count"], 3);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(ids(&body), vec![4, 2]);
        assert_eq!(body["objects"][0]["amount"], 125);
        assert_eq!(body["objects"][0]["currency"], "USD");
    }

    #[tokio::test]
    async fn transactions_page_zero_is_the_last_page() {
        let alice = user("alice");
        let (app, token) = wallet_of(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&per_page=2&page=0")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["page"], 2);
        assert_eq!(ids(&body), vec![1]);
    }

    #[tokio::test]
    async fn transactions_filter_by_currency_and_order() {
        let alice = user("alice");
        let (app, token) = wallet_of(&alice);

        let (status, _, body) = send(
            app,
            get(&format!(
                "/api/wallet/transactions?token={token}&currency=USD&oldest_first=true"
            )),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["total_count"], 2);
        assert_eq!(ids(&body), vec![1, 4]);
    }

    #[tokio::test]
    async fn transactions_reject_unsupported_currency() {
        let alice = user("alice");
        let (app, token) = wallet_of(&alice);

        let (status, _, body) = send(
            app,
            get(&format!("/api/wallet/transactions?token={token}&currency=JPY")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"]["currency"], "JPY is not a valid choice");
    }

    #[tokio::test]
    async fn transactions_reject_page_sent_in_the_body() {
        let alice = user("alice");
        let (app, token) = wallet_of(&alice);

        let req = Request::builder()
            .uri(format!("/api/wallet/transactions?token={token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"page": 2}).to_string()))
            .unwrap();
        let (status, _, body) = send(app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"]["page"], "unknown argument");
    }

    #[tokio::test]
    async fn dev_token_rejects_null_user_id() {
        let app = app_for(test_state(InMemoryUsers::default()));

        let (status, _, body) =
            send(app, post_json("/api/dev/token", json!({"user_id": null}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 1000);
        assert_eq!(body["message"]["user_id"], "user_id is required");
    }

    #[tokio::test]
    async fn payment_config_exposes_app_id_only() {
        let alice = user("alice");
        let config = config_with(&[
            ("CRYPTOPAY_APP_ID", "app-42"),
            ("CRYPTOPAY_APP_KEY", "sk_live_0123456789abcd"),
        ]);
        let state = state_with(config, InMemoryUsers::default().with(alice.clone()));
        let token = state.tokens.issue(alice.id, None, None).unwrap().token;

        let (status, _, body) =
            send(app_for(state), get(&format!("/api/payment/config?token={token}"))).await;

        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(!text.contains("sk_live"));
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body, json!({"app_id": "app-42", "currencies": ["USD", "EUR"]}));
    }

    #[tokio::test]
    async fn payment_config_is_404_without_credentials() {
        let alice = user("alice");
        let (app, token) = signed_in(&alice);

        let (status, _, _) = send(app, get(&format!("/api/payment/config?token={token}"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
