//! # Server Configuration
//!
//! Environment-driven configuration, loaded once at startup.
//!
//! ## Variables
//! ```text
//! MATO_PORT            HTTP port            (default 3000)
//! MATO_DB              SQLite file path     (default ./data/mato.db)
//! TELEGRAM_BOT_TOKEN   Bot token            (optional)
//! TELEGRAM_CHAT_ID     Target chat          (optional)
//! RUST_LOG             Tracing filter       (optional)
//! ```
//!
//! Telegram is optional as a pair: both variables set enables the
//! logbook notifier, anything less disables it with a startup notice.

use std::path::PathBuf;

use anyhow::Context;

/// Telegram notifier credentials.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Loads configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let port = match std::env::var("MATO_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("MATO_PORT is not a valid port: {raw}"))?,
            Err(_) => 3000,
        };

        let database_path = std::env::var("MATO_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/mato.db"));

        let telegram = match (
            std::env::var("TELEGRAM_BOT_TOKEN"),
            std::env::var("TELEGRAM_CHAT_ID"),
        ) {
            (Ok(bot_token), Ok(chat_id)) if !bot_token.is_empty() && !chat_id.is_empty() => {
                Some(TelegramConfig { bot_token, chat_id })
            }
            _ => None,
        };

        Ok(Config {
            port,
            database_path,
            telegram,
        })
    }
}
