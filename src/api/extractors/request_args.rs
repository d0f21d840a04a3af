/*
 * Responsibility
 * - Request (query string + body) を RequestArgs に変換する extractor
 * - body は Content-Type で判定 (JSON object / urlencoded form)、それ以外は無視
 * - 検証そのものは RequestParser の責務 (ここでは形式エラーのみ 400)
 * - body size 超過は 413 (RequestBodyLimitLayer / DefaultBodyLimit)
 *
 * body を消費するため handler の最後の引数に置くこと
 */
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
};
use serde_json::Value;

use crate::error::AppError;
use crate::services::request_parser::RequestArgs;

impl<S> FromRequest<S> for RequestArgs
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut args = RequestArgs::new();
        if let Some(query) = req.uri().query() {
            args = args.with_query(query);
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                tracing::debug!(error = %rejection.body_text(), "failed to buffer request body");
                AppError::bad_request("request body could not be read")
            }
        })?;
        if bytes.is_empty() {
            return Ok(args);
        }

        if content_type.starts_with("application/json") {
            let value: Value = serde_json::from_slice(&bytes)
                .map_err(|_| AppError::bad_request("request body is not valid JSON"))?;
            match value {
                Value::Object(map) => args = args.with_json(map),
                _ => return Err(AppError::bad_request("JSON body must be an object")),
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            args = args.with_form(&bytes);
        }

        Ok(args)
    }
}
