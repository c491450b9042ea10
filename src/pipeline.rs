// =============================================================================
// Pipeline Orchestrator — one full scanner pass
// =============================================================================
//
// Sequence:
//   1. Resolve the ticker universe
//   2. Fetch daily history for the whole universe in one batch
//   3. Compute indicators and detect potential signals per ticker
//   4. Re-check potential signals against intraday prices
//   5. Build the PipelineReport and hand it to the notifier
//
// Data flows strictly forward; every stage produces a new immutable value.
// Collaborator failures fold into the report's RunStatus — the orchestrator
// itself never propagates an error, and no single ticker can abort the batch.
// =============================================================================

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::indicators::IndicatorFrame;
use crate::notify::Notifier;
use crate::report::{PipelineReport, RunStatus};
use crate::signals::{confirm_signals, detect_signal, ConfirmationResult, PotentialSignal};
use crate::sources::{HistorySource, IntradaySource, UniverseSource};

/// Run the signal-detection pipeline once and return the report.
pub async fn run_scan<U, H, I>(
    config: &ScanConfig,
    universe_source: &U,
    history_source: &H,
    intraday_source: &I,
) -> PipelineReport
where
    U: UniverseSource,
    H: HistorySource,
    I: IntradaySource,
{
    // ── 1. Resolve universe ──────────────────────────────────────────────
    let universe = match universe_source.fetch_universe().await {
        Ok(symbols) if !symbols.is_empty() => symbols,
        Ok(_) => {
            warn!("universe source returned no tickers");
            return PipelineReport::empty(RunStatus::UniverseUnavailable);
        }
        Err(e) => {
            warn!(error = %e, "universe fetch failed");
            return PipelineReport::empty(RunStatus::UniverseUnavailable);
        }
    };
    info!(count = universe.len(), "universe resolved");

    // ── 2. Fetch daily history (single batch) ────────────────────────────
    let histories = match history_source
        .fetch_daily_history(&universe, config.lookback_days)
        .await
    {
        Ok(map) if !map.is_empty() => map,
        Ok(_) => {
            warn!("historical batch came back empty");
            return PipelineReport::empty(RunStatus::NoHistoricalData);
        }
        Err(e) => {
            warn!(error = %e, "historical fetch failed");
            return PipelineReport::empty(RunStatus::NoHistoricalData);
        }
    };
    info!(count = histories.len(), "daily history fetched");

    // ── 3. Indicators + signal detection, isolated per ticker ────────────
    let signals = detect_all(&universe, &histories, config);
    info!(count = signals.len(), "potential signals detected");

    // ── 4. Intraday confirmation ─────────────────────────────────────────
    let confirmation = if signals.is_empty() {
        // Nothing to confirm; skip the intraday stage entirely.
        ConfirmationResult::default()
    } else {
        let tickers: Vec<String> = signals.iter().map(|s| s.symbol.clone()).collect();
        let prices = match intraday_source.fetch_latest_prices(&tickers).await {
            Ok(map) => map,
            Err(e) => {
                // Degrade, do not drop: every signal goes to radar.
                warn!(error = %e, "intraday fetch failed — all signals degrade to radar");
                HashMap::new()
            }
        };
        confirm_signals(signals, &prices)
    };

    // ── 5. Build report ──────────────────────────────────────────────────
    let report = PipelineReport::new(RunStatus::Completed, confirmation);
    info!(
        run_id = %report.run_id,
        confirmed = report.confirmed.len(),
        radar = report.radar.len(),
        "scan complete"
    );
    report
}

/// Run the pipeline and deliver the rendered report exactly once.
///
/// Delivery failure is the notifier's story; the report is returned intact
/// either way.
pub async fn run_and_notify<U, H, I, N>(
    config: &ScanConfig,
    universe_source: &U,
    history_source: &H,
    intraday_source: &I,
    notifier: &N,
) -> PipelineReport
where
    U: UniverseSource,
    H: HistorySource,
    I: IntradaySource,
    N: Notifier,
{
    let report = run_scan(config, universe_source, history_source, intraday_source).await;

    if let Err(e) = notifier.deliver(&report.render_text()).await {
        warn!(error = %e, "report delivery failed");
    }

    report
}

/// Evaluate every universe ticker against its history, in universe order.
///
/// Tickers with no series, short history, or unusable data are skipped with
/// a debug log — a per-ticker skip outcome, never a propagated error.
fn detect_all(
    universe: &[String],
    histories: &HashMap<String, crate::types::PriceSeries>,
    config: &ScanConfig,
) -> Vec<PotentialSignal> {
    let mut signals = Vec::new();

    for symbol in universe {
        let Some(series) = histories.get(symbol) else {
            debug!(symbol, "no historical data — skipped");
            continue;
        };

        if series.len() < config.strategy.min_history() {
            debug!(symbol, bars = series.len(), "insufficient history — skipped");
            continue;
        }

        let frame = IndicatorFrame::compute(series, &config.strategy);
        if frame.is_empty() {
            debug!(symbol, "indicators not computable — skipped");
            continue;
        }

        if let Some(signal) = detect_signal(series, &frame, &config.strategy) {
            signals.push(signal);
        }
    }

    signals
}
