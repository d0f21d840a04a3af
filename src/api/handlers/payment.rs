/*
 * Responsibility
 * - GET /api/payment/config: payment page 用の公開設定 (login_required の内側)
 * - 決済 credentials 未設定なら 404
 */
use axum::{Json, extract::State};

use crate::{
    api::dto::{payment::PaymentConfigResponse, wallet::SUPPORTED_CURRENCIES},
    error::AppError,
    state::AppState,
};

pub async fn payment_config(
    State(state): State<AppState>,
) -> Result<Json<PaymentConfigResponse>, AppError> {
    let creds = state
        .config
        .cryptopay
        .as_ref()
        .ok_or(AppError::not_found("payment"))?;

    Ok(Json(PaymentConfigResponse {
        app_id: creds.app_id.clone(),
        currencies: SUPPORTED_CURRENCIES.to_vec(),
    }))
}
