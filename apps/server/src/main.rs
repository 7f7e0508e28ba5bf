//! Mato POS - HTTP API Server
//!
//! The single binary that runs the shop: serves the five screens
//! (sales, credits, reports, logbook, inventory), holds the live cart,
//! and pushes logbook entries to Telegram.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mato_db::{Database, DbConfig};

mod config;
mod error;
mod handlers;
mod notify;
mod routes;
mod state;

use config::Config;
use notify::TelegramNotifier;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mato_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Mato POS server");

    // Database (runs migrations)
    if let Some(dir) = config.database_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    // Telegram notifier, when credentials are present
    let notifier = match config.telegram.clone() {
        Some(telegram) => {
            tracing::info!("Telegram logbook notifications enabled");
            Some(TelegramNotifier::new(telegram))
        }
        None => {
            tracing::info!("Telegram credentials not set, logbook notifications disabled");
            None
        }
    };

    // Application state; restore any half-rung-up sale
    let state = AppState::new(db, notifier);
    state.restore_draft().await?;

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware.
fn create_app(state: AppState) -> Router {
    // The frontend is served from a different origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Mato POS API"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
