//! token 検証 → CurrentUser を extensions に入れる
//!
//! - token は query string `?token=` を優先し、無ければ cookie `token` を使う
//! - 検証 (署名/期限) に失敗、またはユーザーが存在しなければ 401 (body なし)
//! - handler は一切実行されない
//! - 成功時は CurrentUser (user + token parameter) を extensions に格納して next へ

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::CurrentUser;
use crate::error::AppError;
use crate::services::cookie::{TOKEN_COOKIE, extract_cookie};
use crate::state::AppState;

const TOKEN_PARAM: &str = "token";

/// Protect every route of `router`.
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/api/user/me", get(me));
/// let protected = middleware::login_required::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: 未定義 path は 401 ではなく 404 のまま
    router.route_layer(middleware::from_fn_with_state(state, login_required))
}

async fn login_required(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = token_from_request(&req) else {
        tracing::warn!(path = %req.uri().path(), "missing auth token");
        return Err(AppError::Unauthorized);
    };

    let verified = match state.tokens.verify(&token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "auth token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let Some(user) = state.users.find(verified.user_id).await? else {
        tracing::warn!(user_id = %verified.user_id, "auth token subject not found");
        return Err(AppError::Unauthorized);
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(CurrentUser {
        user,
        token_parameter: verified.parameter,
    });

    Ok(next.run(req).await)
}

fn token_from_request(req: &Request) -> Option<String> {
    let from_query = req.uri().query().and_then(|query| {
        ::url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == TOKEN_PARAM)
            .map(|(_, v)| v.into_owned())
    });

    from_query
        .filter(|t| !t.is_empty())
        .or_else(|| extract_cookie(req.headers(), TOKEN_COOKIE))
        .filter(|t| !t.is_empty())
}
