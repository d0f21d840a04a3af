use serde::Serialize;

/// What the payment page needs to start a checkout; the app key stays server-side.
#[derive(Debug, Serialize)]
pub struct PaymentConfigResponse {
    pub app_id: String,
    pub currencies: Vec<&'static str>,
}
