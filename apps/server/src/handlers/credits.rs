//! # Credit Screen Handlers
//!
//! Accounts, statements, manual grants, payments, and the customer
//! directory. Balances are derived by mato-core's ledger from the full
//! history on every request; nothing here caches a balance.
//!
//! ## Listing Behavior
//! The default account list hides settled (zero-balance) accounts to
//! keep the screen focused on money outstanding. A search query widens
//! the view to every matching account, settled or not, so history can
//! always be found.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use mato_core::{
    build_accounts, build_statement, extract_phone, validation, CreditAccount, CreditPayment,
    Customer, Sale, Statement,
};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// =============================================================================
// Accounts
// =============================================================================

/// GET /api/credits?q=
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<CreditAccount>>> {
    let sales = state.db.sales().list_credit().await?;
    let payments = state.db.credits().list_all().await?;
    let customers = state.db.customers().list_all().await?;

    let accounts = build_accounts(&sales, &payments, &customers);

    let query = params.q.trim().to_lowercase();
    let accounts = if query.is_empty() {
        accounts.into_iter().filter(CreditAccount::has_balance).collect()
    } else {
        accounts
            .into_iter()
            .filter(|a| {
                a.phone.to_lowercase().contains(&query)
                    || a.name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&query))
            })
            .collect()
    };

    Ok(Json(accounts))
}

/// GET /api/credits/:phone/statement
pub async fn get_statement(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> ApiResult<Json<Statement>> {
    let sales = state.db.sales().list_credit().await?;
    let payments = state.db.credits().list_all().await?;
    let customers = state.db.customers().list_all().await?;

    Ok(Json(build_statement(&phone, &sales, &payments, &customers)))
}

// =============================================================================
// Postings
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ManualCreditRequest {
    /// Customer label as typed or picked ("612345" or "Amina (612345)").
    pub customer: String,
    /// Raw amount text.
    pub amount: String,
    pub note: Option<String>,
}

/// POST /api/credits/manual - grant credit outside a sale.
pub async fn add_manual_credit(
    State(state): State<AppState>,
    Json(req): Json<ManualCreditRequest>,
) -> ApiResult<Json<Sale>> {
    let phone = validation::validate_phone(&extract_phone(&req.customer))?;
    let amount = validation::validate_amount("amount", &req.amount)?;
    let note = match req.note.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(validation::validate_log_text(text)?),
        _ => None,
    };

    state.db.customers().upsert(&phone, None).await?;
    let sale = state
        .db
        .sales()
        .insert_manual_credit(&phone, amount.cents(), note)
        .await?;
    Ok(Json(sale))
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Raw amount text.
    pub amount: String,
}

/// POST /api/credits/:phone/payments
pub async fn add_payment(
    State(state): State<AppState>,
    Path(phone): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<Json<CreditPayment>> {
    let phone = validation::validate_phone(&phone)?;
    let amount = validation::validate_amount("amount", &req.amount)?;

    let payment = state
        .db
        .credits()
        .insert_payment(&phone, amount.cents())
        .await?;
    Ok(Json(payment))
}

// =============================================================================
// Customer Directory
// =============================================================================

/// GET /api/customers?q= - autocomplete over name or phone.
/// Below the two-character threshold the list is empty, not unfiltered.
pub async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Customer>>> {
    if !validation::autocomplete_ready(&params.q) {
        return Ok(Json(Vec::new()));
    }
    let customers = state.db.customers().search(&params.q, 20).await?;
    Ok(Json(customers))
}

#[derive(Debug, Deserialize)]
pub struct CustomerNameRequest {
    pub name: String,
}

/// PUT /api/customers/:phone - set or correct the display name.
pub async fn rename_customer(
    State(state): State<AppState>,
    Path(phone): Path<String>,
    Json(req): Json<CustomerNameRequest>,
) -> ApiResult<Json<Customer>> {
    let phone = validation::validate_phone(&phone)?;
    let name = validation::validate_name(&req.name)?;

    let customer = state.db.customers().upsert(&phone, Some(&name)).await?;
    Ok(Json(customer))
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

    #[tokio::test]
    async fn test_manual_credit_and_payment_flow() {
        let state = test_state().await;

        add_manual_credit(
            State(state.clone()),
            Json(ManualCreditRequest {
                customer: "Amina (612345)".to_string(),
                amount: "5.00".to_string(),
                note: Some("school fees".to_string()),
            }),
        )
        .await
        .unwrap();

        add_payment(
            State(state.clone()),
            Path("612345".to_string()),
            Json(PaymentRequest {
                amount: "2.00".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(accounts) = list_accounts(
            State(state.clone()),
            Query(SearchParams { q: String::new() }),
        )
        .await
        .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance.cents(), 300);

        let Json(statement) = get_statement(State(state), Path("612345".to_string()))
            .await
            .unwrap();
        assert_eq!(statement.entries.len(), 2);
        assert_eq!(statement.balance.cents(), 300);
    }

    #[tokio::test]
    async fn test_settled_accounts_hidden_unless_searched() {
        let state = test_state().await;

        add_manual_credit(
            State(state.clone()),
            Json(ManualCreditRequest {
                customer: "612345".to_string(),
                amount: "5.00".to_string(),
                note: None,
            }),
        )
        .await
        .unwrap();
        add_payment(
            State(state.clone()),
            Path("612345".to_string()),
            Json(PaymentRequest {
                amount: "5.00".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(default_list) = list_accounts(
            State(state.clone()),
            Query(SearchParams { q: String::new() }),
        )
        .await
        .unwrap();
        assert!(default_list.is_empty());

        let Json(searched) = list_accounts(
            State(state),
            Query(SearchParams {
                q: "6123".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(searched.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected() {
        let state = test_state().await;

        let err = add_manual_credit(
            State(state),
            Json(ManualCreditRequest {
                customer: "612345".to_string(),
                amount: "zero".to_string(),
                note: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_customer_autocomplete_threshold() {
        let state = test_state().await;
        state
            .db
            .customers()
            .upsert("612345", Some("Amina"))
            .await
            .unwrap();

        let Json(short) = search_customers(
            State(state.clone()),
            Query(SearchParams {
                q: "a".to_string(),
            }),
        )
        .await
        .unwrap();
        assert!(short.is_empty());

        let Json(hits) = search_customers(
            State(state),
            Query(SearchParams {
                q: "am".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_customer() {
        let state = test_state().await;
        state.db.customers().upsert("612345", None).await.unwrap();

        let Json(customer) = rename_customer(
            State(state),
            Path("612345".to_string()),
            Json(CustomerNameRequest {
                name: "Amina".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(customer.name.as_deref(), Some("Amina"));
    }
}
