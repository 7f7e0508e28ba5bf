//! # Application State
//!
//! Shared state for all HTTP handlers: the database handle, the live
//! cart, and the optional Telegram notifier.
//!
//! ## Cart Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple requests may access/modify the cart
//! 2. Only one request should modify the cart at a time
//! 3. axum handlers run concurrently
//!
//! The mutex is a `std::sync::Mutex` held only for the in-memory edit,
//! never across an await; the draft write happens on a snapshot after
//! the lock is released.
//!
//! ## Draft Persistence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  request ──► lock cart ──► edit ──► snapshot ──► unlock              │
//! │                                        │                             │
//! │                                        ▼                             │
//! │                               drafts().save(snapshot)                │
//! │                                                                      │
//! │  startup ──► drafts().load() ──► cart restored                       │
//! │  checkout ──► draft cleared inside the checkout transaction          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use mato_core::{Cart, CoreResult};
use mato_db::{Database, DbResult};

use crate::notify::TelegramNotifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    cart: Arc<Mutex<Cart>>,
    pub notifier: Option<TelegramNotifier>,
}

impl AppState {
    pub fn new(db: Database, notifier: Option<TelegramNotifier>) -> Self {
        AppState {
            db,
            cart: Arc::new(Mutex::new(Cart::new())),
            notifier,
        }
    }

    /// Restores the persisted cart draft, if any. A draft that fails to
    /// decode is discarded with a warning - an empty register beats a
    /// wedged one.
    pub async fn restore_draft(&self) -> DbResult<()> {
        match self.db.drafts().load().await {
            Ok(Some(draft)) => {
                info!(items = draft.item_count(), "Cart draft restored");
                *self.cart.lock().expect("cart mutex poisoned") = draft;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(error = %err, "Discarding unreadable cart draft");
                self.db.drafts().clear().await
            }
        }
    }

    /// Read-only access to the cart.
    pub fn with_cart<T>(&self, f: impl FnOnce(&Cart) -> T) -> T {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    /// Mutates the cart and persists the resulting draft.
    ///
    /// The edit happens under the lock; the database write uses a
    /// snapshot taken on the way out. If the mutation fails the draft
    /// is left untouched.
    pub async fn mutate_cart<T>(
        &self,
        f: impl FnOnce(&mut Cart) -> CoreResult<T>,
    ) -> Result<T, crate::error::ApiError> {
        let (result, snapshot) = {
            let mut cart = self.cart.lock().expect("cart mutex poisoned");
            let result = f(&mut cart)?;
            (result, cart.clone())
        };

        self.db.drafts().save(&snapshot).await?;
        Ok(result)
    }

    /// Empties the in-memory cart without touching the persisted draft
    /// (used after checkout, where the transaction already removed it).
    pub fn reset_cart(&self) {
        self.cart.lock().expect("cart mutex poisoned").clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
