//! # Inventory Handlers
//!
//! Catalog autocomplete (shared with the sales screen), the one-at-a-
//! time inventory pager, and product CRUD.
//!
//! ## The Pager
//! The inventory screen walks the catalog in name order, one product
//! per page, with a running total of stock worth. Positions are
//! zero-based; paging past the end yields `product: null` with the
//! count unchanged so the frontend can clamp.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use mato_core::{validation, Money, Product, Unit};
use mato_db::ProductInput;

use crate::error::ApiResult;
use crate::state::AppState;

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/products?q= - name autocomplete.
/// Below the two-character threshold the list is empty, not unfiltered.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    if !validation::autocomplete_ready(&params.q) {
        return Ok(Json(Vec::new()));
    }
    let products = state.db.products().search(&params.q, 20).await?;
    Ok(Json(products))
}

// =============================================================================
// Pager
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PagerParams {
    #[serde(default)]
    pub position: u32,
}

#[derive(Debug, Serialize)]
pub struct InventoryPage {
    pub product: Option<Product>,
    pub position: u32,
    pub count: u32,
    /// Σ qty × price over the whole catalog, in cents.
    pub inventory_worth_cents: i64,
}

/// GET /api/inventory?position=
pub async fn inventory_page(
    State(state): State<AppState>,
    Query(params): Query<PagerParams>,
) -> ApiResult<Json<InventoryPage>> {
    let products = state.db.products();

    let product = products.get_at(params.position).await?;
    let count = products.count().await?;
    let worth = products
        .list_all()
        .await?
        .iter()
        .map(Product::inventory_worth)
        .fold(Money::zero(), |a, b| a + b);

    Ok(Json(InventoryPage {
        product,
        position: params.position,
        count,
        inventory_worth_cents: worth.cents(),
    }))
}

// =============================================================================
// CRUD
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub qty_milli: i64,
    pub unit: Unit,
}

impl ProductRequest {
    fn validate(self) -> ApiResult<ProductInput> {
        let name = validation::validate_name(&self.name)?;
        validation::validate_price_cents("price", self.price_cents)?;
        validation::validate_price_cents("cost", self.cost_cents)?;

        Ok(ProductInput {
            name,
            price_cents: self.price_cents,
            cost_cents: self.cost_cents,
            qty_milli: self.qty_milli,
            unit: self.unit,
        })
    }
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<Product>> {
    let product = state.db.products().insert(req.validate()?).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductRequest>,
) -> ApiResult<Json<Product>> {
    let product = state.db.products().update(&id, req.validate()?).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use mato_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, None)
    }

    fn request(name: &str, price: i64, qty: i64) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price_cents: price,
            cost_cents: price / 2,
            qty_milli: qty,
            unit: Unit::Piece,
        }
    }

    #[tokio::test]
    async fn test_search_threshold() {
        let state = test_state().await;
        create_product(State(state.clone()), Json(request("Banana (kg)", 250, 5000)))
            .await
            .unwrap();

        let Json(short) = search_products(
            State(state.clone()),
            Query(SearchParams {
                q: "b".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(short.is_empty());

        let Json(hits) = search_products(
            State(state),
            Query(SearchParams {
                q: "ba".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_pager_and_worth() {
        let state = test_state().await;
        // 2 × $1.00 + 3 × $2.00 = $8.00 of stock
        create_product(State(state.clone()), Json(request("Apple", 100, 2000)))
            .await
            .unwrap();
        create_product(State(state.clone()), Json(request("Mango", 200, 3000)))
            .await
            .unwrap();

        let Json(page) = inventory_page(
            State(state.clone()),
            Query(PagerParams { position: 0 }),
        )
        .await
        .unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.product.as_ref().unwrap().name, "Apple");
        assert_eq!(page.inventory_worth_cents, 800);

        let Json(past_end) = inventory_page(State(state), Query(PagerParams { position: 5 }))
            .await
            .unwrap();
        assert!(past_end.product.is_none());
        assert_eq!(past_end.count, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let state = test_state().await;
        let Json(product) =
            create_product(State(state.clone()), Json(request("Sugar", 300, 1000)))
                .await
                .unwrap();

        let Json(updated) = update_product(
            State(state.clone()),
            Path(product.id.clone()),
            Json(request("Sugar 1kg", 350, 9000)),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Sugar 1kg");
        assert_eq!(updated.qty_milli, 9000);

        delete_product(State(state.clone()), Path(product.id.clone()))
            .await
            .unwrap();
        let err = delete_product(State(state), Path(product.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let state = test_state().await;

        let err = create_product(State(state), Json(request("Bad", -100, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
