/*
 * Responsibility
 * - Wallet の request / response DTO
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::wallet_repo::{TransactionFilter, TransactionRow};

/// Currencies the wallet and the payment page accept.
pub const SUPPORTED_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// Validated query of GET /api/wallet/transactions.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub page: i64,
    pub per_page: i64,
    #[serde(default)]
    pub currencies: Vec<String>,
    pub oldest_first: bool,
}

impl TransactionListQuery {
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            currencies: self.currencies.clone(),
            oldest_first: self.oldest_first,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: i64,
    pub amount: i64, // minor units
    pub currency: String,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRow> for TransactionResponse {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.transaction_id,
            amount: row.amount,
            currency: row.currency,
            memo: row.memo,
            created_at: row.created_at,
        }
    }
}
