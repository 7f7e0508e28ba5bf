//! # Sale Repository
//!
//! Database operations for completed sales, including the checkout
//! transaction.
//!
//! ## Checkout Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Transaction                                │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── INSERT sale row (lines frozen as JSON)                           │
//! │    │                                                                    │
//! │    ├── UPDATE products SET qty_milli = qty_milli - line.qty             │
//! │    │        (one per line; stock may go negative, that is a             │
//! │    │         bookkeeping fact, not an error)                            │
//! │    │                                                                    │
//! │    └── DELETE cart draft                                                │
//! │    │                                                                    │
//! │  COMMIT ── either the sale, the stock and the draft all move,           │
//! │            or none of them do                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The `lines` Column
//! Line snapshots are stored as a JSON array and decoded through the
//! typed [`SaleLine`] model on the way out. A row that doesn't decode is
//! a loud [`DbError::Decode`], never silently half-read.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mato_core::{Sale, SaleLine, TenderType};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw sale row; `lines` is the undecoded JSON column.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    tender: TenderType,
    total_cents: i64,
    profit_cents: i64,
    customer: Option<String>,
    shs_amount_cents: Option<i64>,
    note: Option<String>,
    lines: String,
    created_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self) -> DbResult<Sale> {
        let lines: Vec<SaleLine> = serde_json::from_str(&self.lines)
            .map_err(|e| DbError::Decode(format!("sale {} lines: {}", self.id, e)))?;
        Ok(Sale {
            id: self.id,
            tender: self.tender,
            total_cents: self.total_cents,
            profit_cents: self.profit_cents,
            customer: self.customer,
            shs_amount_cents: self.shs_amount_cents,
            note: self.note,
            lines,
            created_at: self.created_at,
        })
    }
}

const SELECT_SALE: &str = r#"
    SELECT id, tender, total_cents, profit_cents, customer,
           shs_amount_cents, note, lines, created_at
    FROM sales
"#;

// =============================================================================
// Inputs
// =============================================================================

/// Fields accepted when recording a sale.
///
/// For manual credit grants, `lines` is empty and `note` carries the
/// free-text message.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub tender: TenderType,
    pub total_cents: i64,
    pub profit_cents: i64,
    pub customer: Option<String>,
    pub shs_amount_cents: Option<i64>,
    pub note: Option<String>,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a checkout atomically: the sale row, the per-line stock
    /// decrements and the cart draft removal commit together.
    pub async fn checkout(&self, input: NewSale) -> DbResult<Sale> {
        let sale = Self::build(input);
        let lines_json = serde_json::to_string(&sale.lines)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, tender, total_cents, profit_cents, customer,
                               shs_amount_cents, note, lines, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.tender)
        .bind(sale.total_cents)
        .bind(sale.profit_cents)
        .bind(&sale.customer)
        .bind(sale.shs_amount_cents)
        .bind(&sale.note)
        .bind(&lines_json)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &sale.lines {
            sqlx::query(
                "UPDATE products SET qty_milli = qty_milli - ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(&line.product_id)
            .bind(line.quantity_milli)
            .bind(sale.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_drafts WHERE id = 'current'")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id = %sale.id, tender = ?sale.tender, total = sale.total_cents, "Sale recorded");
        Ok(sale)
    }

    /// Records a manual credit grant (a credit sale without lines).
    /// No stock moves and the cart draft stays untouched.
    pub async fn insert_manual_credit(
        &self,
        phone: &str,
        amount_cents: i64,
        note: Option<String>,
    ) -> DbResult<Sale> {
        let sale = Self::build(NewSale {
            tender: TenderType::Credit,
            total_cents: amount_cents,
            profit_cents: 0,
            customer: Some(phone.to_string()),
            shs_amount_cents: None,
            note,
            lines: Vec::new(),
        });

        sqlx::query(
            r#"
            INSERT INTO sales (id, tender, total_cents, profit_cents, customer,
                               shs_amount_cents, note, lines, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '[]', ?8)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.tender)
        .bind(sale.total_cents)
        .bind(sale.profit_cents)
        .bind(&sale.customer)
        .bind(sale.shs_amount_cents)
        .bind(&sale.note)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %sale.id, phone = %phone, amount = amount_cents, "Manual credit recorded");
        Ok(sale)
    }

    fn build(input: NewSale) -> Sale {
        Sale {
            id: Uuid::new_v4().to_string(),
            tender: input.tender,
            total_cents: input.total_cents,
            profit_cents: input.profit_cents,
            customer: input.customer,
            shs_amount_cents: input.shs_amount_cents,
            note: input.note,
            lines: input.lines,
            created_at: Utc::now(),
        }
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(&format!("{} WHERE id = ?1", SELECT_SALE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SaleRow::into_sale).transpose()
    }

    /// Lists all credit sales, oldest first (the ledger aggregates
    /// over the full history).
    pub async fn list_credit(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} WHERE tender = 'credit' ORDER BY created_at",
            SELECT_SALE
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::into_sale).collect()
    }

    /// Lists sales inside a date window, newest first.
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} WHERE created_at >= ?1 AND created_at <= ?2 ORDER BY created_at DESC",
            SELECT_SALE
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::into_sale).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::ProductInput;
    use mato_core::Unit;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn line(product_id: &str, quantity_milli: i64) -> SaleLine {
        SaleLine {
            product_id: product_id.to_string(),
            name: "Banana (kg)".to_string(),
            price_cents: 250,
            cost_cents: 180,
            quantity_milli,
            unit: Unit::Kg,
        }
    }

    fn cash_sale(lines: Vec<SaleLine>) -> NewSale {
        NewSale {
            tender: TenderType::Cash,
            total_cents: 500,
            profit_cents: 140,
            customer: None,
            shs_amount_cents: None,
            note: None,
            lines,
        }
    }

    #[tokio::test]
    async fn test_checkout_round_trips_lines() {
        let db = test_db().await;

        let product = db
            .products()
            .insert(ProductInput {
                name: "Banana (kg)".to_string(),
                price_cents: 250,
                cost_cents: 180,
                qty_milli: 10_000,
                unit: Unit::Kg,
            })
            .await
            .unwrap();

        let sale = db
            .sales()
            .checkout(cash_sale(vec![line(&product.id, 2000)]))
            .await
            .unwrap();

        let fetched = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_cents, 500);
        assert_eq!(fetched.lines.len(), 1);
        assert_eq!(fetched.lines[0].quantity_milli, 2000);
        assert_eq!(fetched.lines[0].unit, Unit::Kg);
    }

    #[tokio::test]
    async fn test_checkout_decrements_stock() {
        let db = test_db().await;

        let product = db
            .products()
            .insert(ProductInput {
                name: "Banana (kg)".to_string(),
                price_cents: 250,
                cost_cents: 180,
                qty_milli: 10_000,
                unit: Unit::Kg,
            })
            .await
            .unwrap();

        db.sales()
            .checkout(cash_sale(vec![line(&product.id, 2500)]))
            .await
            .unwrap();

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.qty_milli, 7500);
    }

    #[tokio::test]
    async fn test_checkout_clears_draft() {
        let db = test_db().await;

        db.drafts().save(&mato_core::Cart::new()).await.unwrap();
        assert!(db.drafts().load().await.unwrap().is_some());

        db.sales().checkout(cash_sale(vec![])).await.unwrap();
        assert!(db.drafts().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_manual_credit_has_no_lines_and_moves_no_stock() {
        let db = test_db().await;

        let product = db
            .products()
            .insert(ProductInput {
                name: "Soap".to_string(),
                price_cents: 100,
                cost_cents: 60,
                qty_milli: 5000,
                unit: Unit::Piece,
            })
            .await
            .unwrap();

        let grant = db
            .sales()
            .insert_manual_credit("612345", 300, Some("school fees".to_string()))
            .await
            .unwrap();
        assert!(grant.is_manual_credit());

        let fetched = db.sales().get_by_id(&grant.id).await.unwrap().unwrap();
        assert!(fetched.lines.is_empty());
        assert_eq!(fetched.note.as_deref(), Some("school fees"));

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.qty_milli, 5000);
    }

    #[tokio::test]
    async fn test_list_credit_skips_other_tenders() {
        let db = test_db().await;
        let sales = db.sales();

        sales.checkout(cash_sale(vec![])).await.unwrap();
        sales
            .insert_manual_credit("612345", 300, None)
            .await
            .unwrap();

        let credit = sales.list_credit().await.unwrap();
        assert_eq!(credit.len(), 1);
        assert_eq!(credit[0].tender, TenderType::Credit);
    }

    #[tokio::test]
    async fn test_list_between_filters_window() {
        let db = test_db().await;
        let sales = db.sales();

        sales.checkout(cash_sale(vec![])).await.unwrap();

        let now = Utc::now();
        let today = sales
            .list_between(now - chrono::Duration::hours(1), now + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(today.len(), 1);

        let yesterday = sales
            .list_between(
                now - chrono::Duration::hours(26),
                now - chrono::Duration::hours(25),
            )
            .await
            .unwrap();
        assert!(yesterday.is_empty());
    }
}
