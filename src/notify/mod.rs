// =============================================================================
// Notification Module
// =============================================================================
//
// Outbound delivery of the rendered report. Channels are plain HTTP GET
// services; delivery failures are logged per channel and never fail the run —
// the computed report stays valid whether or not anyone receives it.

pub mod callmebot;
pub mod telegram;

use anyhow::Result;
use tracing::{info, warn};

pub use callmebot::CallMeBotNotifier;
pub use telegram::TelegramNotifier;

/// Consumer of the rendered report text.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn deliver(&self, text: &str) -> Result<()>;
}

/// Fan-out over every configured channel.
///
/// Channels are optional: whichever credentials were present in the
/// environment decide what gets built. A failing channel is logged and the
/// rest are still attempted.
#[derive(Debug, Clone, Default)]
pub struct NotifierStack {
    pub telegram: Option<TelegramNotifier>,
    pub callmebot: Option<CallMeBotNotifier>,
}

impl NotifierStack {
    pub fn channel_count(&self) -> usize {
        self.telegram.is_some() as usize + self.callmebot.is_some() as usize
    }
}

impl Notifier for NotifierStack {
    async fn deliver(&self, text: &str) -> Result<()> {
        if self.channel_count() == 0 {
            warn!("no notification channels configured — report not delivered");
            return Ok(());
        }

        if let Some(tg) = &self.telegram {
            match tg.send(text).await {
                Ok(()) => info!("report delivered via telegram"),
                Err(e) => warn!(error = %e, "telegram delivery failed"),
            }
        }

        if let Some(cmb) = &self.callmebot {
            match cmb.send(text).await {
                Ok(()) => info!("report delivered via whatsapp"),
                Err(e) => warn!(error = %e, "whatsapp delivery failed"),
            }
        }

        Ok(())
    }
}
