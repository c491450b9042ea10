// =============================================================================
// Data Sources — external collaborator contracts
// =============================================================================
//
// The pipeline only ever sees these traits; the concrete HTTP client lives in
// `brapi`. Everything crossing this boundary is plain data (symbols, bar
// series, scalar prices) so tests can drive the pipeline with in-memory
// implementations.

pub mod brapi;

use std::collections::HashMap;

use anyhow::Result;

use crate::types::PriceSeries;

/// Produces the ordered, deduplicated set of ticker symbols to scan.
#[allow(async_fn_in_trait)]
pub trait UniverseSource {
    async fn fetch_universe(&self) -> Result<Vec<String>>;
}

/// Produces daily price history for a batch of tickers in one request.
/// Tickers with no data are simply absent from the map, not errors.
#[allow(async_fn_in_trait)]
pub trait HistorySource {
    async fn fetch_daily_history(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<HashMap<String, PriceSeries>>;
}

/// Produces the latest known intraday price per ticker in one request.
/// Absent entries mean "no intraday price available".
#[allow(async_fn_in_trait)]
pub trait IntradaySource {
    async fn fetch_latest_prices(&self, symbols: &[String]) -> Result<HashMap<String, f64>>;
}

pub use brapi::BrapiClient;
