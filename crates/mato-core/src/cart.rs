//! # Cart & Line-Item Reconciliation
//!
//! The in-progress sale: a list of line items copied from catalog
//! products, each with three mutually-dependent fields the cashier can
//! edit independently - quantity, unit price, and line total.
//!
//! ## Reconciliation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Three Fields, One Edit At A Time                       │
//! │                                                                     │
//! │  edit quantity ──► override present & not locked?                   │
//! │                      yes: price = override / qty   (2 dp)           │
//! │                      no:  quantity only                             │
//! │                                                                     │
//! │  edit price ─────► override present?                                │
//! │                      yes: qty = override / price   (3 dp)           │
//! │                      no:  price only                                │
//! │                                                                     │
//! │  edit line total ► record raw text, then:                           │
//! │                      locked kg item: qty = total / price            │
//! │                      price > 0:      qty = total / price            │
//! │                      qty > 0:        price = total / qty            │
//! │                      both zero:      nothing                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input Policy
//! Line edits never fail: empty text means zero, unparseable or
//! negative text is silently ignored and the previous state stands.
//! Quantities, prices and line totals never go below zero. The cashier is never
//! blocked mid-entry - required fields are enforced at checkout, not
//! here. The only error these operations return is an unknown item key.
//!
//! All derived figures (cart total, profit) are recomputed from current
//! state on every call, never cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{Product, SaleLine, Unit};

// =============================================================================
// Line Total Override
// =============================================================================

/// A cashier-entered target for `price × quantity` on one line.
///
/// The raw text is kept verbatim so the input field can echo exactly
/// what was typed (including partial input like "12."); the parsed value
/// is what reconciliation and the cart total use. Empty, unparseable or
/// negative text leaves the record in place with no numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOverride {
    raw: String,
    value: Option<Money>,
}

impl LineOverride {
    fn new(raw: &str) -> Self {
        LineOverride {
            raw: raw.to_string(),
            // A line cannot be worth less than nothing; negative text is
            // recorded but carries no value, like any other non-amount.
            value: Money::parse(raw).filter(|m| !m.is_negative()),
        }
    }

    /// The text exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed target amount, when the text is numeric.
    pub fn value(&self) -> Option<Money> {
        self.value
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart: a snapshot of a product's pricing fields plus
/// the mutable reconciled state.
///
/// ## Design Notes
/// - Pricing fields are frozen at add time; catalog edits made while a
///   sale is open do not reach lines already in the cart.
/// - One line per product: re-adding the same product bumps quantity.
/// - `line_override` and `price_locked` live on the item itself rather
///   than in side maps keyed by id, so a removed line takes its
///   override with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: Money,
    pub cost: Money,
    pub quantity: Quantity,
    pub unit: Unit,
    /// Cashier-entered line-total target, when present.
    pub line_override: Option<LineOverride>,
    /// Kg items only: while set, quantity edits never back-derive the
    /// unit price from the override.
    pub price_locked: bool,
}

impl CartItem {
    /// Creates a line from a catalog product with the default first
    /// quantity: one piece, or 0.1 kg for weight items.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price(),
            cost: product.cost(),
            quantity: Self::increment_for(product.unit),
            unit: product.unit,
            line_override: None,
            price_locked: false,
        }
    }

    fn increment_for(unit: Unit) -> Quantity {
        match unit {
            Unit::Piece => Quantity::ONE,
            Unit::Kg => Quantity::TENTH,
        }
    }

    fn override_value(&self) -> Option<Money> {
        self.line_override.as_ref().and_then(LineOverride::value)
    }

    /// Charged line amount: the override when present and numeric,
    /// otherwise price × quantity.
    pub fn line_total(&self) -> Money {
        self.override_value()
            .unwrap_or_else(|| self.price.mul_quantity(self.quantity))
    }

    /// Profit contribution: (price − cost) × quantity. Overrides change
    /// what is charged, not the cost basis - cost is a catalog fact
    /// independent of a negotiated price.
    pub fn line_profit(&self) -> Money {
        (self.price - self.cost).mul_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress sale.
///
/// ## Invariants
/// - Lines are unique by `product_id`.
/// - Quantities never go negative through these operations.
/// - Total and profit are derived on demand, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: None,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn item_mut(&mut self, product_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CoreError::ItemNotInCart(product_id.to_string()))
    }

    /// Adds a product, or bumps its quantity when already present
    /// (+1 piece, +0.1 kg). An existing line keeps its override and
    /// lock; overrides are cleared only by removal or a cart clear.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += CartItem::increment_for(item.unit);
            return;
        }
        if self.items.is_empty() {
            self.created_at = Some(Utc::now());
        }
        self.items.push(CartItem::from_product(product));
    }

    /// Sets a line's quantity from raw text.
    ///
    /// Empty text means zero; unparseable or negative text leaves the
    /// line as-is.
    /// When a numeric override exists and the line is not price-locked,
    /// the unit price is re-derived as `override / quantity` (skipped
    /// for a zero quantity, where the price stands).
    pub fn set_quantity(&mut self, product_id: &str, raw: &str) -> CoreResult<()> {
        let item = self.item_mut(product_id)?;

        let parsed = if raw.trim().is_empty() {
            Some(Quantity::zero())
        } else {
            Quantity::parse(raw).filter(|q| !q.is_negative())
        };
        let Some(quantity) = parsed else {
            return Ok(());
        };

        if !item.price_locked {
            if let Some(target) = item.override_value() {
                if let Some(price) = target.div_quantity(quantity) {
                    item.price = price;
                }
            }
        }
        item.quantity = quantity;
        Ok(())
    }

    /// Sets a line's unit price from raw text.
    ///
    /// Empty text means zero; unparseable or negative text leaves the
    /// line as-is.
    /// When a numeric override exists, quantity is re-derived as
    /// `override / price` (skipped for a zero price).
    pub fn set_price(&mut self, product_id: &str, raw: &str) -> CoreResult<()> {
        let item = self.item_mut(product_id)?;

        let parsed = if raw.trim().is_empty() {
            Some(Money::zero())
        } else {
            Money::parse(raw).filter(|p| !p.is_negative())
        };
        let Some(price) = parsed else {
            return Ok(());
        };

        if let Some(target) = item.override_value() {
            if let Some(quantity) = Quantity::from_total(target, price) {
                item.quantity = quantity;
            }
        }
        item.price = price;
        Ok(())
    }

    /// Sets a line's total from raw text, recording the text verbatim.
    ///
    /// A price-locked kg line re-derives quantity only, so the known
    /// per-kilogram price is never "corrected" away from its catalog
    /// value. Otherwise the missing factor is re-derived: quantity when
    /// the price is set, price when only the quantity is. Empty text
    /// clears the numeric value but keeps the record, so the field
    /// echoes what was typed.
    pub fn set_line_total(&mut self, product_id: &str, raw: &str) -> CoreResult<()> {
        let item = self.item_mut(product_id)?;

        let entered = LineOverride::new(raw);
        let target = entered.value();
        item.line_override = Some(entered);

        let Some(target) = target else {
            return Ok(());
        };

        if item.price_locked && item.unit == Unit::Kg {
            if let Some(quantity) = Quantity::from_total(target, item.price) {
                item.quantity = quantity;
            }
        } else if item.price.is_positive() {
            if let Some(quantity) = Quantity::from_total(target, item.price) {
                item.quantity = quantity;
            }
        } else if item.quantity.is_positive() {
            if let Some(price) = target.div_quantity(item.quantity) {
                item.price = price;
            }
        }
        Ok(())
    }

    /// Toggles the price lock. Meaningful for kg lines only; on piece
    /// lines this is a no-op.
    pub fn set_price_locked(&mut self, product_id: &str, locked: bool) -> CoreResult<()> {
        let item = self.item_mut(product_id)?;
        if item.unit == Unit::Kg {
            item.price_locked = locked;
        }
        Ok(())
    }

    /// Removes a line (its override goes with it).
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before {
            return Err(CoreError::ItemNotInCart(product_id.to_string()));
        }
        Ok(())
    }

    /// Clears all lines, overrides included.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = None;
    }

    /// The charged cart total: Σ line totals (overrides win where
    /// present). Recomputed fresh on every call.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).fold(Money::zero(), |a, b| a + b)
    }

    /// The profit figure: Σ (price − cost) × qty, untouched by overrides.
    pub fn profit(&self) -> Money {
        self.items.iter().map(CartItem::line_profit).fold(Money::zero(), |a, b| a + b)
    }

    /// Freezes the lines into sale snapshots for checkout.
    pub fn to_sale_lines(&self) -> Vec<SaleLine> {
        self.items
            .iter()
            .map(|i| SaleLine {
                product_id: i.product_id.clone(),
                name: i.name.clone(),
                price_cents: i.price.cents(),
                cost_cents: i.cost.cents(),
                quantity_milli: i.quantity.milli(),
                unit: i.unit,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
