//! # Credit Payment Repository
//!
//! Database operations for payments received against credit accounts.
//!
//! Balances are never stored; the ledger in mato-core derives them from
//! the full payment and credit-sale history on every request.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mato_core::CreditPayment;

/// Repository for credit payment database operations.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
}

impl CreditRepository {
    /// Creates a new CreditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CreditRepository { pool }
    }

    /// Records a payment against a phone key's balance.
    pub async fn insert_payment(&self, phone: &str, amount_cents: i64) -> DbResult<CreditPayment> {
        let payment = CreditPayment {
            id: Uuid::new_v4().to_string(),
            phone: phone.to_string(),
            amount_cents,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO credit_payments (id, phone, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.phone)
        .bind(payment.amount_cents)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        debug!(phone = %phone, amount = amount_cents, "Credit payment recorded");
        Ok(payment)
    }

    /// Lists all payments, oldest first (ledger input).
    pub async fn list_all(&self) -> DbResult<Vec<CreditPayment>> {
        let payments = sqlx::query_as::<_, CreditPayment>(
            r#"
            SELECT id, phone, amount_cents, created_at
            FROM credit_payments
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists payments inside a date window (drawer report input).
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<CreditPayment>> {
        let payments = sqlx::query_as::<_, CreditPayment>(
            r#"
            SELECT id, phone, amount_cents, created_at
            FROM credit_payments
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.credits();

        repo.insert_payment("612345", 500).await.unwrap();
        repo.insert_payment("698765", 200).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].phone, "612345");
        assert_eq!(all[0].amount_cents, 500);
    }

    #[tokio::test]
    async fn test_list_between_window() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.credits();

        repo.insert_payment("612345", 500).await.unwrap();

        let now = Utc::now();
        let inside = repo
            .list_between(now - chrono::Duration::minutes(5), now + chrono::Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(inside.len(), 1);

        let outside = repo
            .list_between(
                now - chrono::Duration::days(2),
                now - chrono::Duration::days(1),
            )
            .await
            .unwrap();
        assert!(outside.is_empty());
    }
}
