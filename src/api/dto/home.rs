use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub product_name: String,
}
