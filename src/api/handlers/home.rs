/*
 * Responsibility
 * - GET /api/ (product name を返すだけ)
 */
use axum::{Json, extract::State};

use crate::{api::dto::home::HomeResponse, state::AppState};

pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        product_name: state.config.product_name.clone(),
    })
}
