// =============================================================================
// BDR Scout — Main Entry Point
// =============================================================================
//
// One idempotent pass per invocation: resolve the BDR universe, fetch daily
// history, detect crossover signals, confirm against intraday prices, and
// deliver the report. Safe to invoke repeatedly (cron, scheduler, by hand) —
// nothing persists across runs other than the outbound notification.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod config;
mod indicators;
mod notify;
mod pipeline;
mod report;
mod signals;
mod sources;
mod types;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ScanConfig;
use crate::notify::{CallMeBotNotifier, NotifierStack, TelegramNotifier};
use crate::sources::BrapiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        BDR Scout — Crossover Scanner                    ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = ScanConfig::load("scan_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScanConfig::default()
    });

    // Override universe suffixes from env if available.
    if let Ok(suffixes) = std::env::var("SCOUT_SUFFIXES") {
        config.universe_suffixes = suffixes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    info!(
        lookback_days = config.lookback_days,
        suffixes = ?config.universe_suffixes,
        short_ema = config.strategy.short_ema_span,
        long_ema = config.strategy.long_ema_span,
        "scanner configured"
    );

    // ── 2. Build collaborators ───────────────────────────────────────────
    let brapi_token = std::env::var("BRAPI_TOKEN").ok();
    if brapi_token.is_none() {
        warn!("BRAPI_TOKEN not set — using unauthenticated quota");
    }
    let brapi = BrapiClient::new(brapi_token, config.universe_suffixes.clone());

    let mut notifiers = NotifierStack::default();
    if let (Ok(token), Ok(chat_id)) = (
        std::env::var("TELEGRAM_BOT_TOKEN"),
        std::env::var("TELEGRAM_CHAT_ID"),
    ) {
        notifiers.telegram = Some(TelegramNotifier::new(token, chat_id));
    }
    if let (Ok(phone), Ok(api_key)) = (
        std::env::var("CALLMEBOT_PHONE"),
        std::env::var("CALLMEBOT_APIKEY"),
    ) {
        notifiers.callmebot = Some(CallMeBotNotifier::new(phone, api_key));
    }
    info!(channels = notifiers.channel_count(), "notification channels configured");

    // ── 3. Run one scan ──────────────────────────────────────────────────
    let report = pipeline::run_and_notify(&config, &brapi, &brapi, &brapi, &notifiers).await;

    info!(
        run_id = %report.run_id,
        status = %report.status,
        confirmed = report.confirmed.len(),
        radar = report.radar.len(),
        "BDR Scout run finished"
    );

    Ok(())
}
