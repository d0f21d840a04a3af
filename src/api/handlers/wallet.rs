/*
 * Responsibility
 * - /api/wallet 系 handler (login_required の内側)
 * - query は strict に検証し、未知の引数は 400
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::wallet::{SUPPORTED_CURRENCIES, TransactionListQuery, TransactionResponse},
        extractors::AuthUser,
    },
    error::AppError,
    repos::wallet_repo::UserTransactions,
    services::{
        pagination::{Page, paginate},
        request_parser::{ArgKind, Argument, Location, RequestArgs, RequestParser},
    },
    state::AppState,
};

const DEFAULT_PER_PAGE: i64 = 20;

fn list_parser() -> RequestParser {
    RequestParser::new()
        .add_argument(
            Argument::new("page")
                .kind(ArgKind::Int)
                .location(Location::Query)
                .default_value(1),
        )
        .add_argument(
            Argument::new("per_page")
                .kind(ArgKind::Int)
                .location(Location::Query)
                .default_value(DEFAULT_PER_PAGE),
        )
        // ?currency=USD&currency=EUR
        .add_argument(
            Argument::new("currency")
                .location(Location::Query)
                .append()
                .choices(SUPPORTED_CURRENCIES)
                .dest("currencies")
                .store_missing(false),
        )
        .add_argument(
            Argument::new("oldest_first")
                .kind(ArgKind::Bool)
                .location(Location::Query)
                .default_value(false),
        )
        // auth transport; consumed by login_required
        .add_argument(
            Argument::new("token")
                .location(Location::Query)
                .store_missing(false),
        )
}

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    args: RequestArgs,
) -> Result<Json<Page<TransactionResponse>>, AppError> {
    let query: TransactionListQuery = list_parser().parse_args(&args, true)?.deserialize()?;

    let source = UserTransactions::new(state.wallet.as_ref(), current.user.id, query.filter());
    let page = paginate(query.per_page, query.page, &source).await?;

    Ok(Json(page.map(TransactionResponse::from)))
}
