// =============================================================================
// CallMeBot Notification Channel — WhatsApp via whatsapp.php
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Delivers report payloads to a WhatsApp number through CallMeBot.
#[derive(Clone)]
pub struct CallMeBotNotifier {
    phone: String,
    api_key: String,
    client: reqwest::Client,
}

impl CallMeBotNotifier {
    pub fn new(phone: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            phone: phone.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// GET /whatsapp.php with phone, text and apikey query parameters.
    #[instrument(skip(self, text), name = "callmebot::send")]
    pub async fn send(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .get("https://api.callmebot.com/whatsapp.php")
            .query(&[
                ("phone", self.phone.as_str()),
                ("text", text),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("CallMeBot whatsapp request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("CallMeBot whatsapp.php returned {status}: {body}");
        }

        debug!(phone = %self.phone, "whatsapp message delivered");
        Ok(())
    }
}

impl std::fmt::Debug for CallMeBotNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMeBotNotifier")
            .field("phone", &self.phone)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let n = CallMeBotNotifier::new("+5511999999999", "topsecret");
        let dbg = format!("{n:?}");
        assert!(!dbg.contains("topsecret"));
        assert!(dbg.contains("<redacted>"));
    }
}
