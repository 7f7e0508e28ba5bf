//! # HTTP Handlers
//!
//! One module per screen of the frontend:
//!
//! - [`cart`] - the sales screen's live cart (add, edit, remove)
//! - [`sales`] - checkout
//! - [`credits`] - credit accounts, payments, manual grants, customers
//! - [`reports`] - drawer reconciliation and sale listings
//! - [`logbook`] - free-text operations log (+ Telegram push)
//! - [`inventory`] - catalog search, pager and edits

pub mod cart;
pub mod credits;
pub mod inventory;
pub mod logbook;
pub mod reports;
pub mod sales;
