//! # Report Handlers
//!
//! Drawer reconciliation over a date window, plus the windowed sale
//! listing the cashier scrolls when something doesn't add up.
//!
//! The window defaults to the current UTC day; the frontend passes
//! explicit RFC 3339 bounds when the owner picks a date.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use mato_core::{DrawerReport, Sale};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl WindowParams {
    /// Resolves the window, defaulting to today (UTC midnight to
    /// midnight).
    fn resolve(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start_of_today = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let from = self.from.unwrap_or(start_of_today);
        let to = self.to.unwrap_or(from + Duration::days(1));
        (from, to)
    }
}

#[derive(Debug, Serialize)]
pub struct DrawerResponse {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub report: DrawerReport,
    /// Sales in the window, newest first.
    pub sales: Vec<Sale>,
}

/// GET /api/reports/drawer?from=&to=
pub async fn drawer_report(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> ApiResult<Json<DrawerResponse>> {
    let (from, to) = params.resolve();

    let sales = state.db.sales().list_between(from, to).await?;
    let payments = state.db.credits().list_between(from, to).await?;

    let report = DrawerReport::build(&sales, &payments);
    Ok(Json(DrawerResponse {
        from,
        to,
        report,
        sales,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mato_core::TenderType;
    use mato_db::{Database, DbConfig, NewSale};

    #[tokio::test]
    async fn test_drawer_report_today() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, None);

        state
            .db
            .sales()
            .checkout(NewSale {
                tender: TenderType::Cash,
                total_cents: 500,
                profit_cents: 120,
                customer: None,
                shs_amount_cents: None,
                note: None,
                lines: vec![],
            })
            .await
            .unwrap();
        state
            .db
            .credits()
            .insert_payment("612345", 200)
            .await
            .unwrap();

        let Json(response) = drawer_report(
            State(state),
            Query(WindowParams {
                from: None,
                to: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.sales.len(), 1);
        assert_eq!(response.report.cash_sales.cents(), 500);
        assert_eq!(response.report.credit_payments.cents(), 200);
        assert_eq!(response.report.expected_cash_drawer.cents(), 700);
        assert_eq!(response.report.profit.cents(), 120);
    }

    #[tokio::test]
    async fn test_window_excludes_outside_sales() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, None);

        state
            .db
            .sales()
            .checkout(NewSale {
                tender: TenderType::Cash,
                total_cents: 500,
                profit_cents: 120,
                customer: None,
                shs_amount_cents: None,
                note: None,
                lines: vec![],
            })
            .await
            .unwrap();

        let yesterday = Utc::now() - Duration::days(1);
        let Json(response) = drawer_report(
            State(state),
            Query(WindowParams {
                from: Some(yesterday - Duration::hours(12)),
                to: Some(yesterday),
            }),
        )
        .await
        .unwrap();

        assert!(response.sales.is_empty());
        assert_eq!(response.report.expected_cash_drawer.cents(), 0);
    }
}
