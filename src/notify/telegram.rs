// =============================================================================
// Telegram Notification Channel — Bot API sendMessage
// =============================================================================
//
// SECURITY: the bot token is part of the URL path; it is never logged.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Delivers report payloads through a Telegram bot chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            client,
        }
    }

    /// GET /bot{token}/sendMessage with the text as a query parameter.
    #[instrument(skip(self, text), name = "telegram::send")]
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let resp = self
            .client
            .get(&url)
            .query(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            .await
            .context("Telegram sendMessage request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram sendMessage returned {status}: {body}");
        }

        debug!(chat_id = %self.chat_id, "telegram message delivered");
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}
