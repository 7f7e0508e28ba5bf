//! # Customer Directory Repository
//!
//! Phone-keyed customer records. The phone is the identity used across
//! sales, payments and the ledger; the name is a display nicety that
//! can be attached or corrected at any time.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use mato_core::Customer;

/// Repository for customer directory operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates or updates the record for a phone key.
    ///
    /// First contact with a phone inserts it; a later call with a name
    /// fills the name in. Passing `None` leaves an existing name alone
    /// (directory entries are enriched, not blanked, by routine flows).
    pub async fn upsert(&self, phone: &str, name: Option<&str>) -> DbResult<Customer> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO customers (id, phone, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(phone) DO UPDATE SET
                name = COALESCE(excluded.name, customers.name)
            "#,
        )
        .bind(&id)
        .bind(phone)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(phone = %phone, "Customer upserted");

        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, phone, name, created_at FROM customers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by phone key.
    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, phone, name, created_at FROM customers WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists the whole directory, ordered by name then phone.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, phone, name, created_at FROM customers ORDER BY name, phone",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Autocomplete over name or phone substring.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Customer>> {
        let pattern = format!("%{}%", query.trim());
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, phone, name, created_at
            FROM customers
            WHERE phone LIKE ?1 OR name LIKE ?1
            ORDER BY name, phone
            LIMIT ?2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
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
    async fn test_upsert_enriches_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let first = repo.upsert("612345", None).await.unwrap();
        assert_eq!(first.name, None);

        let named = repo.upsert("612345", Some("Amina")).await.unwrap();
        assert_eq!(named.name.as_deref(), Some("Amina"));
        assert_eq!(named.id, first.id);

        // None never blanks an existing name
        let again = repo.upsert("612345", None).await.unwrap();
        assert_eq!(again.name.as_deref(), Some("Amina"));
    }

    #[tokio::test]
    async fn test_search_matches_name_or_phone() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.upsert("612345", Some("Amina")).await.unwrap();
        repo.upsert("698765", Some("Hassan")).await.unwrap();

        let by_name = repo.search("ami", 10).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].phone, "612345");

        let by_phone = repo.search("987", 10).await.unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].name.as_deref(), Some("Hassan"));
    }
}
