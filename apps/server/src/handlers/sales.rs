//! # Checkout Handler
//!
//! Turns the reconciled cart into an immutable sale.
//!
//! ## Tender Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  cash    customer label optional, stored as typed                   │
//! │  credit  customer phone REQUIRED (extracted from "Name (phone)"),   │
//! │          directory entry upserted, sale feeds the ledger            │
//! │  shs     tendered SHS amount REQUIRED and positive, stored on the   │
//! │          sale and never converted                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Total and profit are copied verbatim from the cart - checkout trusts
//! the reconciler and recomputes nothing. The sale insert, per-line
//! stock decrements and draft removal commit in one transaction; only
//! then is the in-memory cart emptied.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use mato_core::{extract_phone, validation, CoreError, Sale, TenderType};
use mato_db::NewSale;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub tender: TenderType,
    /// Customer label as typed or picked ("612345" or "Amina (612345)").
    pub customer: Option<String>,
    /// Raw SHS amount text, required for SHS tenders.
    pub shs_amount: Option<String>,
}

/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<Sale>> {
    let (lines, total_cents, profit_cents, is_empty) = state.with_cart(|cart| {
        (
            cart.to_sale_lines(),
            cart.total().cents(),
            cart.profit().cents(),
            cart.is_empty(),
        )
    });

    if is_empty {
        return Err(CoreError::EmptyCart.into());
    }

    let label = req
        .customer
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (customer, shs_amount_cents) = match req.tender {
        TenderType::Cash => (label.map(str::to_string), None),

        TenderType::Credit => {
            let label = label.ok_or(CoreError::CustomerRequired)?;
            let phone = validation::validate_phone(&extract_phone(label))?;

            // Keep the directory current: a "Name (phone)" label carries
            // the name, a bare phone just registers the key.
            let name = label
                .split_once('(')
                .map(|(prefix, _)| prefix.trim())
                .filter(|n| !n.is_empty());
            state.db.customers().upsert(&phone, name).await?;

            (Some(phone), None)
        }

        TenderType::Shs => {
            let raw = req
                .shs_amount
                .as_deref()
                .ok_or(CoreError::ShsAmountRequired)?;
            let amount = validation::validate_amount("shs amount", raw)
                .map_err(|_| CoreError::ShsAmountRequired)?;
            (label.map(str::to_string), Some(amount.cents()))
        }
    };

    let sale = state
        .db
        .sales()
        .checkout(NewSale {
            tender: req.tender,
            total_cents,
            profit_cents,
            customer,
            shs_amount_cents,
            note: None,
            lines,
        })
        .await?;

    state.reset_cart();
    Ok(Json(sale))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use mato_core::Unit;
    use mato_db::{Database, DbConfig, ProductInput};

    async fn state_with_cart() -> (AppState, String) {
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

        let state = AppState::new(db, None);
        state
            .mutate_cart(|cart| {
                cart.add_product(&product);
                cart.set_quantity(&product.id, "2")
            })
            .await
            .unwrap();
        (state, product.id)
    }

    fn request(tender: TenderType) -> CheckoutRequest {
        CheckoutRequest {
            tender,
            customer: None,
            shs_amount: None,
        }
    }

    #[tokio::test]
    async fn test_cash_checkout_copies_cart_figures() {
        let (state, product_id) = state_with_cart().await;

        let Json(sale) = checkout(State(state.clone()), Json(request(TenderType::Cash)))
            .await
            .unwrap();

        // 2 kg × $2.50 charged; 2 kg × $0.70 margin
        assert_eq!(sale.total_cents, 500);
        assert_eq!(sale.profit_cents, 140);
        assert_eq!(sale.lines.len(), 1);

        // Stock moved, cart and draft emptied
        let after = state
            .db
            .products()
            .get_by_id(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.qty_milli, 8000);
        assert!(state.with_cart(|c| c.is_empty()));
        assert!(state.db.drafts().load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_credit_requires_customer() {
        let (state, _) = state_with_cart().await;

        let err = checkout(State(state), Json(request(TenderType::Credit)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_credit_extracts_phone_and_registers_customer() {
        let (state, _) = state_with_cart().await;

        let Json(sale) = checkout(
            State(state.clone()),
            Json(CheckoutRequest {
                tender: TenderType::Credit,
                customer: Some("Amina (612345)".to_string()),
                shs_amount: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(sale.customer.as_deref(), Some("612345"));

        let customer = state
            .db
            .customers()
            .get_by_phone("612345")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.name.as_deref(), Some("Amina"));
    }

    #[tokio::test]
    async fn test_shs_requires_positive_amount() {
        let (state, _) = state_with_cart().await;

        let err = checkout(State(state.clone()), Json(request(TenderType::Shs)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let Json(sale) = checkout(
            State(state),
            Json(CheckoutRequest {
                tender: TenderType::Shs,
                customer: None,
                shs_amount: Some("65000".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(sale.shs_amount_cents, Some(6_500_000));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, None);

        let err = checkout(State(state), Json(request(TenderType::Cash)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
