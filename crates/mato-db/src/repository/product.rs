//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Name autocomplete (prefix/substring LIKE over an indexed column)
//! - Ordered paging for the inventory editor (one product at a time)
//! - Field updates and stock decrements at checkout
//!
//! The catalog is a few hundred rows for a single shop, so a LIKE scan
//! over the name index is plenty; no full-text machinery needed.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mato_core::{Product, Unit};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Autocomplete
/// let results = repo.search("ban", 20).await?;
///
/// // Inventory pager: third product in name order
/// let product = repo.get_at(2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub qty_milli: i64,
    pub unit: Unit,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches products by name substring, ordered by name.
    ///
    /// An empty query lists the catalog from the top (the caller
    /// decides whether to ask at all; autocomplete waits for two
    /// typed characters).
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        let pattern = format!("%{}%", query);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, cost_cents, qty_milli, unit,
                   created_at, updated_at
            FROM products
            WHERE name LIKE ?1
            ORDER BY name
            LIMIT ?2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists the whole catalog ordered by name (inventory worth sums
    /// over this).
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, cost_cents, qty_milli, unit,
                   created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets the product at a zero-based position in name order.
    ///
    /// The inventory screen steps through the catalog one product at a
    /// time; the position plus [`count`](Self::count) drives its pager.
    pub async fn get_at(&self, position: u32) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, cost_cents, qty_milli, unit,
                   created_at, updated_at
            FROM products
            ORDER BY name
            LIMIT 1 OFFSET ?1
            "#,
        )
        .bind(position)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<u32> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u32)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, cost_cents, qty_milli, unit,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it.
    pub async fn insert(&self, input: ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            price_cents: input.price_cents,
            cost_cents: input.cost_cents,
            qty_milli: input.qty_milli,
            unit: input.unit,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, cost_cents, qty_milli,
                                  unit, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.qty_milli)
        .bind(product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Updates a product's editable fields and returns the new row.
    pub async fn update(&self, id: &str, input: ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, price_cents = ?3, cost_cents = ?4,
                qty_milli = ?5, unit = ?6, updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price_cents)
        .bind(input.cost_cents)
        .bind(input.qty_milli)
        .bind(input.unit)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product from the catalog. Past sale lines keep their
    /// snapshots, so history is unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
