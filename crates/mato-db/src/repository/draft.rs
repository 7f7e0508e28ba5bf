//! # Cart Draft Repository
//!
//! Persists the in-progress cart so a browser refresh or server restart
//! doesn't lose a half-rung-up sale.
//!
//! ## Lifecycle
//! ```text
//! every cart mutation ──► save()   (overwrite the single 'current' row)
//! server startup      ──► load()   (restore into the live cart state)
//! successful checkout ──► cleared inside the checkout transaction
//! ```
//!
//! The payload is the serialized [`Cart`] itself, typed end to end; a
//! draft written by an incompatible older build fails to decode loudly
//! rather than loading garbage into the register.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mato_core::Cart;

/// The single draft row's key.
const DRAFT_ID: &str = "current";

/// Repository for the persisted cart draft.
#[derive(Debug, Clone)]
pub struct DraftRepository {
    pool: SqlitePool,
}

impl DraftRepository {
    /// Creates a new DraftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DraftRepository { pool }
    }

    /// Overwrites the draft with the current cart state.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        let payload = serde_json::to_string(cart)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO cart_drafts (id, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(DRAFT_ID)
        .bind(&payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(items = cart.item_count(), "Cart draft saved");
        Ok(())
    }

    /// Loads the draft, if one exists.
    pub async fn load(&self) -> DbResult<Option<Cart>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM cart_drafts WHERE id = ?1")
                .bind(DRAFT_ID)
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(json) => {
                let cart = serde_json::from_str(&json)
                    .map_err(|e| DbError::Decode(format!("cart draft: {}", e)))?;
                Ok(Some(cart))
            }
            None => Ok(None),
        }
    }

    /// Removes the draft (also done inside the checkout transaction).
    pub async fn clear(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_drafts WHERE id = ?1")
            .bind(DRAFT_ID)
            .execute(&self.pool)
            .await?;
        Ok(())
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

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

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

        let mut cart = Cart::new();
        cart.add_product(&product);
        cart.set_line_total(&product.id, "5.00").unwrap();

        db.drafts().save(&cart).await.unwrap();

        let restored = db.drafts().load().await.unwrap().unwrap();
        assert_eq!(restored.item_count(), 1);
        assert_eq!(restored.total(), cart.total());
        // The raw override text survives the round trip
        let item = &restored.items()[0];
        assert_eq!(item.line_override.as_ref().unwrap().raw(), "5.00");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_draft() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drafts = db.drafts();

        drafts.save(&Cart::new()).await.unwrap();
        drafts.save(&Cart::new()).await.unwrap();

        assert!(drafts.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drafts = db.drafts();

        drafts.save(&Cart::new()).await.unwrap();
        drafts.clear().await.unwrap();

        assert!(drafts.load().await.unwrap().is_none());
    }
}
