//! # Domain Types
//!
//! Core domain types used throughout Mato POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────────┐     │
//! │  │    Product    │   │     Sale      │   │   CreditPayment   │     │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────────  │     │
//! │  │  id (UUID)    │   │  id (UUID)    │   │  id (UUID)        │     │
//! │  │  name         │   │  lines[]      │   │  phone            │     │
//! │  │  price_cents  │   │  total_cents  │   │  amount_cents     │     │
//! │  │  cost_cents   │   │  profit_cents │   └───────────────────┘     │
//! │  │  qty_milli    │   │  tender       │                             │
//! │  │  unit         │   │  customer     │   ┌───────────────────┐     │
//! │  └───────────────┘   └───────────────┘   │ Customer/LogEntry │     │
//! │                                          └───────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money fields are integer cents, quantity fields integer milli-units;
//! the `Money`/`Quantity` accessors wrap them on demand (the raw i64
//! layout keeps the structs directly `FromRow`-able in mato-db).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Unit of Sale
// =============================================================================

/// How a product is measured at the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Sold by count; quantities are whole multiples of one.
    Piece,
    /// Sold by weight; fractional quantities down to the gram.
    Kg,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Piece
    }
}

// =============================================================================
// Tender Type
// =============================================================================

/// The payment rail a sale settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TenderType {
    /// US dollars in the drawer.
    Cash,
    /// On the customer's credit account (requires a phone key).
    Credit,
    /// Somali Shillings, tracked separately and never converted.
    Shs,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Unit cost in cents (for profit accounting).
    pub cost_cents: i64,

    /// Quantity on hand in milli-units.
    pub qty_milli: i64,

    /// Piece or weight item.
    pub unit: Unit,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    #[inline]
    pub fn on_hand(&self) -> Quantity {
        Quantity::from_milli(self.qty_milli)
    }

    /// Stock worth at list price (qty × price).
    pub fn inventory_worth(&self) -> Money {
        self.price().mul_quantity(self.on_hand())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line snapshot inside a completed sale.
///
/// Product details are copied at checkout so the sale history stays
/// intact when the catalog changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Unit price in cents at time of sale (possibly negotiated).
    pub price_cents: i64,
    /// Unit cost in cents at time of sale (frozen catalog fact).
    pub cost_cents: i64,
    /// Quantity sold in milli-units.
    pub quantity_milli: i64,
    pub unit: Unit,
}

impl SaleLine {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    /// Line revenue as displayed on statements (price × quantity).
    pub fn line_total(&self) -> Money {
        self.price().mul_quantity(self.quantity())
    }
}

/// An immutable record of a completed transaction.
///
/// A credit-type sale with an empty `lines` list is a manual credit
/// grant; its `note` carries the free-text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub tender: TenderType,
    /// Charged total in cents (reconciled cart total, overrides included).
    pub total_cents: i64,
    /// Profit in cents ((price − cost) × qty over all lines).
    pub profit_cents: i64,
    /// Customer phone key; required for credit sales.
    pub customer: Option<String>,
    /// Somali Shillings tendered, for SHS sales only.
    pub shs_amount_cents: Option<i64>,
    /// Free-text note (manual credit grants).
    pub note: Option<String>,
    pub lines: Vec<SaleLine>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.profit_cents)
    }

    /// Manual credit grants are stored as credit sales without lines.
    pub fn is_manual_credit(&self) -> bool {
        self.tender == TenderType::Credit && self.lines.is_empty()
    }
}

// =============================================================================
// Credit Payment
// =============================================================================

/// A payment received against a customer's credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreditPayment {
    pub id: String,
    pub phone: String,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl CreditPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A directory entry mapping a phone key to an optional display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// "Name (phone)" when a name is known, else the bare phone.
    pub fn display_label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} ({})", name, self.phone),
            _ => self.phone.clone(),
        }
    }
}

// =============================================================================
// Logbook Entry
// =============================================================================

/// A free-text operations logbook entry (incidents, reversals, cash
/// differences, stock received, shortages).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LogEntry {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(tender: TenderType, lines: Vec<SaleLine>) -> Sale {
        Sale {
            id: "s1".to_string(),
            tender,
            total_cents: 500,
            profit_cents: 100,
            customer: None,
            shs_amount_cents: None,
            note: None,
            lines,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_manual_credit_detection() {
        assert!(sale(TenderType::Credit, vec![]).is_manual_credit());
        assert!(!sale(TenderType::Cash, vec![]).is_manual_credit());

        let line = SaleLine {
            product_id: "p1".to_string(),
            name: "Soap".to_string(),
            price_cents: 100,
            cost_cents: 60,
            quantity_milli: 1000,
            unit: Unit::Piece,
        };
        assert!(!sale(TenderType::Credit, vec![line]).is_manual_credit());
    }

    #[test]
    fn test_sale_line_total() {
        let line = SaleLine {
            product_id: "p1".to_string(),
            name: "Banana (kg)".to_string(),
            price_cents: 250,
            cost_cents: 180,
            quantity_milli: 1500,
            unit: Unit::Kg,
        };
        // $2.50 × 1.5 = $3.75
        assert_eq!(line.line_total().cents(), 375);
    }

    #[test]
    fn test_customer_display_label() {
        let mut customer = Customer {
            id: "c1".to_string(),
            phone: "612345".to_string(),
            name: Some("Amina".to_string()),
            created_at: Utc::now(),
        };
        assert_eq!(customer.display_label(), "Amina (612345)");

        customer.name = None;
        assert_eq!(customer.display_label(), "612345");
    }

    #[test]
    fn test_inventory_worth() {
        let product = Product {
            id: "p1".to_string(),
            name: "Raisins (kg)".to_string(),
            price_cents: 400,
            cost_cents: 300,
            qty_milli: 2500,
            unit: Unit::Kg,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        // 2.5 kg × $4.00 = $10.00
        assert_eq!(product.inventory_worth().cents(), 1000);
    }
}
