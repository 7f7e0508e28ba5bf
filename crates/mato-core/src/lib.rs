//! # mato-core: Pure Business Logic for Mato POS
//!
//! This crate is the **heart** of Mato POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Mato POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (browser)                          │   │
//! │  │   Sales ─ Credits ─ Reports ─ Logbook ─ Inventory              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               apps/server (axum handlers)                       │   │
//! │  │   cart edits, checkout, ledger, reports, logbook, inventory    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mato-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ ┌────────────┐  │   │
//! │  │   │ money  │ │quantity│ │  cart  │ │ ledger │ │   report   │  │   │
//! │  │   │ Money  │ │Quantity│ │  Cart  │ │accounts│ │DrawerReport│  │   │
//! │  │   └────────┘ └────────┘ └────────┘ └────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mato-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, CreditPayment, etc.)
//! - [`money`] - Money in integer cents (no floating point!)
//! - [`quantity`] - Quantities in integer milli-units
//! - [`cart`] - The cart and its line-item reconciliation rules
//! - [`ledger`] - Derived credit accounts and statements
//! - [`report`] - Drawer reconciliation figures
//! - [`error`] - Domain error types
//! - [`validation`] - Committed-input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Arithmetic**: cents and milli-units (i64), never floats
//! 4. **Derived, Not Stored**: totals, balances and reports are recomputed
//!    from source records on every call
//!
//! ## Example Usage
//!
//! ```rust
//! use mato_core::money::Money;
//! use mato_core::quantity::Quantity;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(250); // $2.50/kg
//!
//! // A cashier keys a $5.00 line total; the quantity follows
//! let qty = Quantity::from_total(Money::from_cents(500), price);
//! assert_eq!(qty, Some(Quantity::from_milli(2000))); // 2.000 kg
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod ledger;
pub mod money;
pub mod quantity;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mato_core::Money` instead of
// `use mato_core::money::Money`

pub use cart::{Cart, CartItem, LineOverride};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{build_accounts, build_statement, extract_phone, CreditAccount, Statement};
pub use money::Money;
pub use quantity::Quantity;
pub use report::DrawerReport;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum typed characters before product/customer autocomplete fires.
///
/// ## Business Reason
/// A single keystroke matches half the catalog; two characters keep the
/// dropdown short enough to scan at the register.
pub const AUTOCOMPLETE_MIN_CHARS: usize = 2;

/// Maximum length of a customer phone key.
pub const MAX_PHONE_LEN: usize = 30;

/// Maximum length of a product or customer name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a logbook entry or manual-credit note.
pub const MAX_LOG_TEXT: usize = 2000;
