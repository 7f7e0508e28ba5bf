//! # API Routes
//!
//! The full route table, one nest per screen.
//!
//! ```text
//! /api
//! ├── /cart                 GET, DELETE
//! │   └── /items            POST
//! │       └── /:id          DELETE
//! │           ├── /quantity    PUT
//! │           ├── /price       PUT
//! │           ├── /line-total  PUT
//! │           └── /price-lock  PUT
//! ├── /checkout             POST
//! ├── /credits              GET
//! │   ├── /manual           POST
//! │   └── /:phone
//! │       ├── /statement    GET
//! │       └── /payments     POST
//! ├── /customers            GET
//! │   └── /:phone           PUT
//! ├── /reports/drawer       GET
//! ├── /logbook              GET, POST
//! │   └── /:id              DELETE
//! ├── /products             GET, POST
//! │   └── /:id              PUT, DELETE
//! └── /inventory            GET
//! ```

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{cart, credits, inventory, logbook, reports, sales};
use crate::state::AppState;

/// Builds the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Sales screen: the live cart and checkout
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/cart/items", post(cart::add_item))
        .route("/cart/items/:id", delete(cart::remove_item))
        .route("/cart/items/:id/quantity", put(cart::set_quantity))
        .route("/cart/items/:id/price", put(cart::set_price))
        .route("/cart/items/:id/line-total", put(cart::set_line_total))
        .route("/cart/items/:id/price-lock", put(cart::set_price_lock))
        .route("/checkout", post(sales::checkout))
        // Credits screen
        .route("/credits", get(credits::list_accounts))
        .route("/credits/manual", post(credits::add_manual_credit))
        .route("/credits/:phone/statement", get(credits::get_statement))
        .route("/credits/:phone/payments", post(credits::add_payment))
        .route("/customers", get(credits::search_customers))
        .route("/customers/:phone", put(credits::rename_customer))
        // Reports screen
        .route("/reports/drawer", get(reports::drawer_report))
        // Logbook screen
        .route(
            "/logbook",
            get(logbook::list_entries).post(logbook::add_entry),
        )
        .route("/logbook/:id", delete(logbook::delete_entry))
        // Inventory screen (product search is shared with sales)
        .route(
            "/products",
            get(inventory::search_products).post(inventory::create_product),
        )
        .route(
            "/products/:id",
            put(inventory::update_product).delete(inventory::delete_product),
        )
        .route("/inventory", get(inventory::inventory_page))
}
