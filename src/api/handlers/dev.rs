/*
 * Responsibility
 * - POST /api/dev/token: dev/test DB に繋がっている時だけ token を発行する
 * - それ以外の環境では route が存在しないように振る舞う (404)
 */
use axum::{
    Json,
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
};
use uuid::Uuid;

use crate::{
    api::dto::token::{IssueTokenRequest, TokenResponse},
    error::AppError,
    services::{
        cookie::{TOKEN_COOKIE, build_set_cookie},
        request_parser::{ArgKind, Argument, Location, RequestArgs, RequestParser},
    },
    state::AppState,
};

fn issue_parser() -> RequestParser {
    RequestParser::new()
        .add_argument(
            Argument::new("user_id")
                .location(Location::Json)
                .required()
                .nullable(false)
                .help("user_id is required"),
        )
        .add_argument(
            Argument::new("parameter")
                .kind(ArgKind::Json)
                .location(Location::Json),
        )
        .add_argument(
            Argument::new("ttl_seconds")
                .kind(ArgKind::Int)
                .location(Location::Json),
        )
}

pub async fn issue_token(
    State(state): State<AppState>,
    args: RequestArgs,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.is_dev_or_test_env() {
        return Err(AppError::not_found("route"));
    }

    let req: IssueTokenRequest = issue_parser().parse_args(&args, true)?.deserialize()?;

    let user_id = Uuid::parse_str(&req.user_id)
        .map_err(|_| AppError::invalid_field("user_id", "user_id must be a UUID"))?;
    let ttl_seconds = match req.ttl_seconds {
        Some(ttl) if ttl <= 0 => {
            return Err(AppError::invalid_field(
                "ttl_seconds",
                "ttl_seconds must be greater than 0",
            ));
        }
        Some(ttl) => Some(ttl as u64),
        None => None,
    };

    if state.users.find(user_id).await?.is_none() {
        return Err(AppError::not_found("user"));
    }

    let issued = state.tokens.issue(user_id, req.parameter, ttl_seconds)?;
    tracing::info!(%user_id, expires_in = issued.expires_in, "issued dev auth token");

    let cookie = build_set_cookie(
        TOKEN_COOKIE,
        &issued.token,
        issued.expires_in,
        state.config.app_env.is_production(),
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(TokenResponse {
            token: issued.token,
            expires_in: issued.expires_in,
        }),
    ))
}
