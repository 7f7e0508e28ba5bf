//! # Drawer Reports
//!
//! End-of-window reconciliation figures, computed from the sales and
//! payments that fall inside a date range.
//!
//! ## What the numbers mean
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  cash_sales        Σ totals of cash sales                           │
//! │  credit_sales      Σ totals of credit cart sales (lines present)    │
//! │  manual_credits    Σ amounts granted outside a sale                 │
//! │  credits_given     credit_sales + manual_credits                    │
//! │  credit_payments   Σ payments received on credit accounts           │
//! │  shs_revenue       Σ tendered SHS amounts (never converted)         │
//! │  profit            Σ per-sale profit figures                        │
//! │                                                                     │
//! │  expected_cash_drawer = cash_sales + credit_payments                │
//! │  expected_shs_drawer  = shs_revenue                                 │
//! │                                                                     │
//! │  The two drawers are separate currencies; no exchange rate exists   │
//! │  anywhere in the system.                                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Date filtering happens at the query layer; this module only sums
//! what it is handed.

use serde::Serialize;

use crate::money::Money;
use crate::types::{CreditPayment, Sale, TenderType};

/// The reconciliation summary for one date window.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawerReport {
    pub profit: Money,
    pub cash_sales: Money,
    pub credit_sales: Money,
    pub manual_credits: Money,
    pub credits_given: Money,
    pub credit_payments: Money,
    pub shs_revenue: Money,
    pub expected_cash_drawer: Money,
    pub expected_shs_drawer: Money,
    pub sale_count: usize,
}

impl DrawerReport {
    /// Sums a window of sales and payments into the drawer figures.
    pub fn build(sales: &[Sale], payments: &[CreditPayment]) -> Self {
        let mut report = DrawerReport::default();

        for sale in sales {
            report.profit += sale.profit();
            match sale.tender {
                TenderType::Cash => report.cash_sales += sale.total(),
                TenderType::Credit => {
                    if sale.is_manual_credit() {
                        report.manual_credits += sale.total();
                    } else {
                        report.credit_sales += sale.total();
                    }
                }
                TenderType::Shs => {
                    report.shs_revenue +=
                        Money::from_cents(sale.shs_amount_cents.unwrap_or(0));
                }
            }
        }
        report.sale_count = sales.len();
        report.credits_given = report.credit_sales + report.manual_credits;

        for payment in payments {
            report.credit_payments += payment.amount();
        }

        report.expected_cash_drawer = report.cash_sales + report.credit_payments;
        report.expected_shs_drawer = report.shs_revenue;
        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sale(tender: TenderType, total: i64, profit: i64) -> Sale {
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            tender,
            total_cents: total,
            profit_cents: profit,
            customer: None,
            shs_amount_cents: None,
            note: None,
            lines: vec![crate::types::SaleLine {
                product_id: "p1".to_string(),
                name: "Soap".to_string(),
                price_cents: total,
                cost_cents: total - profit,
                quantity_milli: 1000,
                unit: crate::types::Unit::Piece,
            }],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_window() {
        let report = DrawerReport::build(&[], &[]);
        assert_eq!(report.expected_cash_drawer, Money::zero());
        assert_eq!(report.expected_shs_drawer, Money::zero());
        assert_eq!(report.sale_count, 0);
    }

    #[test]
    fn test_cash_and_payments_fill_the_drawer() {
        let sales = vec![
            sale(TenderType::Cash, 500, 100),
            sale(TenderType::Cash, 300, 50),
        ];
        let payments = vec![CreditPayment {
            id: "pay1".to_string(),
            phone: "61".to_string(),
            amount_cents: 200,
            created_at: Utc::now(),
        }];

        let report = DrawerReport::build(&sales, &payments);
        assert_eq!(report.cash_sales, Money::from_cents(800));
        assert_eq!(report.credit_payments, Money::from_cents(200));
        assert_eq!(report.expected_cash_drawer, Money::from_cents(1000));
        assert_eq!(report.profit, Money::from_cents(150));
    }

    #[test]
    fn test_credit_splits_cart_sales_from_manual_grants() {
        let mut grant = sale(TenderType::Credit, 300, 0);
        grant.lines.clear();
        grant.customer = Some("61".to_string());
        let mut cart = sale(TenderType::Credit, 500, 120);
        cart.customer = Some("61".to_string());

        let report = DrawerReport::build(&[grant, cart], &[]);
        assert_eq!(report.credit_sales, Money::from_cents(500));
        assert_eq!(report.manual_credits, Money::from_cents(300));
        assert_eq!(report.credits_given, Money::from_cents(800));
        // Credit never touches the cash drawer
        assert_eq!(report.expected_cash_drawer, Money::zero());
    }

    #[test]
    fn test_shs_tracked_separately() {
        let mut shs = sale(TenderType::Shs, 250, 70);
        shs.shs_amount_cents = Some(65_000_00);

        let report = DrawerReport::build(&[shs], &[]);
        assert_eq!(report.shs_revenue, Money::from_cents(65_000_00));
        assert_eq!(report.expected_shs_drawer, Money::from_cents(65_000_00));
        // SHS revenue never leaks into the cash figures
        assert_eq!(report.cash_sales, Money::zero());
        assert_eq!(report.expected_cash_drawer, Money::zero());
        // Profit still counts - it is currency-free bookkeeping
        assert_eq!(report.profit, Money::from_cents(70));
    }
}
