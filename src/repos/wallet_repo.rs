/*
 * Responsibility
 * - wallet_transactions の読み出し (WalletLedger trait と PostgreSQL 実装)
 * - ページング用の PageSource 実装 (count + LIMIT/OFFSET)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::services::pagination::PageSource;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    #[sqlx(rename = "transactionId")]
    pub transaction_id: i64,

    // minor units (e.g. cents)
    pub amount: i64,
    pub currency: String,
    pub memo: Option<String>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Narrows a user's transaction list. Empty `currencies` means every currency.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub currencies: Vec<String>,
    pub oldest_first: bool,
}

impl TransactionFilter {
    fn order(&self) -> &'static str {
        if self.oldest_first {
            r#""createdAt" ASC, "transactionId" ASC"#
        } else {
            r#""createdAt" DESC, "transactionId" DESC"#
        }
    }
}

#[async_trait]
pub trait WalletLedger: Send + Sync {
    async fn count(&self, user_id: Uuid, filter: &TransactionFilter) -> Result<i64, RepoError>;

    async fn fetch(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TransactionRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgWalletLedger {
    db: PgPool,
}

impl PgWalletLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WalletLedger for PgWalletLedger {
    async fn count(&self, user_id: Uuid, filter: &TransactionFilter) -> Result<i64, RepoError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM wallet_transactions
            WHERE "userId" = $1
              AND (cardinality($2::text[]) = 0 OR currency = ANY($2))
            "#,
        )
        .bind(user_id)
        .bind(filter.currencies.as_slice())
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    async fn fetch(
        &self,
        user_id: Uuid,
        filter: &TransactionFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<TransactionRow>, RepoError> {
        let sql = format!(
            r#"
            SELECT
                "transactionId", amount, currency, memo, "createdAt"
            FROM wallet_transactions
            WHERE "userId" = $1
              AND (cardinality($2::text[]) = 0 OR currency = ANY($2))
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            filter.order()
        );

        let rows = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(user_id)
            .bind(filter.currencies.as_slice())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }
}

/// A single user's transactions, newest first unless the filter says otherwise.
pub struct UserTransactions<'a> {
    ledger: &'a dyn WalletLedger,
    user_id: Uuid,
    filter: TransactionFilter,
}

impl<'a> UserTransactions<'a> {
    pub fn new(ledger: &'a dyn WalletLedger, user_id: Uuid, filter: TransactionFilter) -> Self {
        Self {
            ledger,
            user_id,
            filter,
        }
    }
}

#[async_trait]
impl<'a> PageSource for UserTransactions<'a> {
    type Item = TransactionRow;

    async fn count(&self) -> Result<i64, RepoError> {
        self.ledger.count(self.user_id, &self.filter).await
    }

    async fn fetch(&self, offset: i64, limit: i64) -> Result<Vec<TransactionRow>, RepoError> {
        self.ledger
            .fetch(self.user_id, &self.filter, offset, limit)
            .await
    }
}
