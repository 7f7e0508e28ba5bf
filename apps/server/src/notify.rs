//! # Telegram Notifier
//!
//! Fire-and-forget push of logbook entries to a Telegram chat, so the
//! owner sees incidents without being in the shop.
//!
//! ## Failure Policy
//! A notification is a courtesy, never a dependency: the logbook write
//! has already committed before the send is attempted, and any failure
//! here is logged at warn and dropped. The API response never waits on
//! or reflects Telegram.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TelegramConfig;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Shared handle for sending Telegram messages.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: Arc<TelegramConfig>,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            // Builder only fails on TLS backend misconfiguration
            .unwrap_or_default();

        TelegramNotifier {
            client,
            config: Arc::new(config),
        }
    }

    /// Spawns a background send; returns immediately.
    pub fn notify(&self, text: String) {
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.send(&text).await;
        });
    }

    async fn send(&self, text: &str) {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text,
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Telegram notification delivered");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Telegram rejected notification");
            }
            Err(err) => {
                warn!(error = %err, "Telegram notification failed");
            }
        }
    }
}
