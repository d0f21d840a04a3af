/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - repo error / token error / validation error を統一的に変換
 *
 * Body shapes
 * - 400: {"code": <u32>, "message": <string | {field: reason}>}
 * - 401: empty body
 * - 404 / 413 / 500: {"code": <u32>, "message": <string>}
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth_token::TokenError;

/// Application error code carried by every validation failure.
pub const VALIDATION_ERROR_CODE: u32 = 1000;

const NOT_FOUND_CODE: u32 = 404;
const PAYLOAD_TOO_LARGE_CODE: u32 = 413;
const INTERNAL_ERROR_CODE: u32 = 500;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u32,
    pub message: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request ({code}): {message}")]
    BadRequest { code: u32, message: Value },
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: VALIDATION_ERROR_CODE,
            message: Value::String(message.into()),
        }
    }

    /// 400 whose message maps each offending field to a reason.
    pub fn invalid_fields(fields: Map<String, Value>) -> Self {
        Self::BadRequest {
            code: VALIDATION_ERROR_CODE,
            message: Value::Object(fields),
        }
    }

    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(field.to_string(), Value::String(reason.into()));
        Self::invalid_fields(fields)
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            // 401 は body なし
            AppError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                NOT_FOUND_CODE,
                Value::String(format!("{resource} not found.")),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                PAYLOAD_TOO_LARGE_CODE,
                Value::String("request body is too large".into()),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_CODE,
                Value::String("internal server error".into()),
            ),
        };

        (status, Json(ErrorResponse { code, message })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            // Signing failures are server-side; everything else is the caller's token.
            TokenError::Sign(err) => {
                tracing::error!(error = %err, "failed to sign auth token");
                AppError::Internal
            }
            _ => AppError::Unauthorized,
        }
    }
}
