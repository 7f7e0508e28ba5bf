//! # Cart Handlers
//!
//! The sales screen's live cart. Every mutation goes through
//! [`AppState::mutate_cart`], which persists the draft after the edit.
//!
//! ## Input Contract
//! Quantity, price and line-total edits take the field's raw text and
//! never fail on it: empty means zero, unparseable text leaves the line
//! as it was. The only 4xx these endpoints produce is an unknown item
//! or product key. The response is always the full reconciled cart, so
//! the frontend re-renders every derived field from one source.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use mato_core::{Cart, CoreError, Unit};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// One rendered cart line.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity_milli: i64,
    /// Quantity as display text ("2", "0.125").
    pub quantity: String,
    pub unit: Unit,
    pub line_total_cents: i64,
    /// The override text exactly as typed, for echoing in the field.
    pub override_raw: Option<String>,
    pub price_locked: bool,
}

/// The full reconciled cart.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_cents: i64,
    pub profit_cents: i64,
}

impl CartView {
    fn render(cart: &Cart) -> Self {
        CartView {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    price_cents: item.price.cents(),
                    quantity_milli: item.quantity.milli(),
                    quantity: item.quantity.to_string(),
                    unit: item.unit,
                    line_total_cents: item.line_total().cents(),
                    override_raw: item.line_override.as_ref().map(|o| o.raw().to_string()),
                    price_locked: item.price_locked,
                })
                .collect(),
            total_cents: cart.total().cents(),
            profit_cents: cart.profit().cents(),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
}

/// Raw text of an edited field.
#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceLockEdit {
    pub locked: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/cart
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(state.with_cart(CartView::render))
}

/// POST /api/cart/items - add a product (or bump its quantity).
pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> ApiResult<Json<CartView>> {
    let product = state
        .db
        .products()
        .get_by_id(&req.product_id)
        .await?
        .ok_or_else(|| ApiError::from(CoreError::ProductNotFound(req.product_id.clone())))?;

    state
        .mutate_cart(|cart| {
            cart.add_product(&product);
            Ok(())
        })
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// PUT /api/cart/items/:id/quantity
pub async fn set_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| cart.set_quantity(&product_id, &edit.value))
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// PUT /api/cart/items/:id/price
pub async fn set_price(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| cart.set_price(&product_id, &edit.value))
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// PUT /api/cart/items/:id/line-total
pub async fn set_line_total(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(edit): Json<FieldEdit>,
) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| cart.set_line_total(&product_id, &edit.value))
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// PUT /api/cart/items/:id/price-lock
pub async fn set_price_lock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(edit): Json<PriceLockEdit>,
) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| cart.set_price_locked(&product_id, edit.locked))
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// DELETE /api/cart/items/:id
pub async fn remove_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| cart.remove_item(&product_id))
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

/// DELETE /api/cart - abandon the sale.
pub async fn clear_cart(State(state): State<AppState>) -> ApiResult<Json<CartView>> {
    state
        .mutate_cart(|cart| {
            cart.clear();
            Ok(())
        })
        .await?;
    Ok(Json(state.with_cart(CartView::render)))
}

// =============================================================================
// Unit Tests
// =============================================================================
