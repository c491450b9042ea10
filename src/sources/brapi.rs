// =============================================================================
// brapi.dev REST API Client — universe, daily history, intraday prices
// =============================================================================
//
// Serves all three collaborator roles of the pipeline from the brapi quote
// API. Each stage is a single batch request covering the whole universe; a
// failed batch means "no data for this stage", never a partial retry.
//
// SECURITY: the API token is sent as a query parameter and never logged.
// =============================================================================

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::types::{Bar, PriceSeries};

use super::{HistorySource, IntradaySource, UniverseSource};

/// brapi REST client implementing the universe, history, and intraday roles.
#[derive(Clone)]
pub struct BrapiClient {
    base_url: String,
    token: Option<String>,
    /// Ticker suffixes defining the depositary-receipt universe.
    suffixes: Vec<String>,
    client: reqwest::Client,
}

// -----------------------------------------------------------------------------
// Response shapes
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    stocks: Vec<ListedStock>,
}

#[derive(Debug, Deserialize)]
struct ListedStock {
    stock: String,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    results: Vec<QuoteResult>,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    symbol: String,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "historicalDataPrice", default)]
    historical_data_price: Vec<HistoricalBar>,
}

/// One daily bar as brapi serialises it; any field may be null.
#[derive(Debug, Deserialize)]
struct HistoricalBar {
    /// UNIX timestamp (seconds) of the trading day.
    date: i64,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

impl BrapiClient {
    pub fn new(token: Option<String>, suffixes: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!("BrapiClient initialised (base_url=https://brapi.dev)");

        Self {
            base_url: "https://brapi.dev".to_string(),
            token,
            suffixes,
            client,
        }
    }

    /// Map a lookback in days to the smallest provider range covering it.
    fn range_for_days(days: u32) -> &'static str {
        match days {
            0..=30 => "1mo",
            31..=90 => "3mo",
            91..=180 => "6mo",
            _ => "1y",
        }
    }

    fn token_params(&self) -> Vec<(&'static str, String)> {
        match &self.token {
            Some(t) => vec![("token", t.clone())],
            None => Vec::new(),
        }
    }

    /// GET /api/quote/{tickers} with the given extra query parameters.
    async fn get_quotes(
        &self,
        symbols: &[String],
        params: &[(&'static str, String)],
    ) -> Result<QuoteResponse> {
        let url = format!("{}/api/quote/{}", self.base_url, symbols.join(","));

        let mut query = self.token_params();
        query.extend(params.iter().cloned());

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("GET /api/quote request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("brapi GET /api/quote returned {status}: {body}");
        }

        resp.json::<QuoteResponse>()
            .await
            .context("failed to parse quote response")
    }
}

// -----------------------------------------------------------------------------
// Pure response-to-domain conversion (kept separate so it is testable)
// -----------------------------------------------------------------------------

/// Filter listed tickers down to the configured suffixes, deduplicated and
/// order-preserving.
fn filter_universe(stocks: Vec<ListedStock>, suffixes: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    stocks
        .into_iter()
        .map(|s| s.stock)
        .filter(|sym| suffixes.iter().any(|suf| sym.ends_with(suf.as_str())))
        .filter(|sym| seen.insert(sym.clone()))
        .collect()
}

/// Convert one quote result into a price series. Bars with any missing field
/// are skipped with a warn; a result with no usable bars yields `None` so the
/// ticker is simply absent from the history map.
fn series_from_result(result: QuoteResult) -> Option<PriceSeries> {
    let mut bars = Vec::with_capacity(result.historical_data_price.len());

    for raw in result.historical_data_price {
        let date = match DateTime::from_timestamp(raw.date, 0) {
            Some(ts) => ts.date_naive(),
            None => {
                warn!(symbol = %result.symbol, ts = raw.date, "unparseable bar timestamp — skipped");
                continue;
            }
        };

        match (raw.open, raw.high, raw.low, raw.close, raw.volume) {
            (Some(open), Some(high), Some(low), Some(close), Some(volume)) => bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume,
            }),
            _ => {
                debug!(symbol = %result.symbol, %date, "incomplete bar — skipped");
            }
        }
    }

    let series = PriceSeries::new(result.symbol, bars);
    if series.is_empty() {
        None
    } else {
        Some(series)
    }
}

// -----------------------------------------------------------------------------
// Collaborator trait implementations
// -----------------------------------------------------------------------------

impl UniverseSource for BrapiClient {
    /// GET /api/quote/list filtered down to the configured BDR suffixes.
    #[instrument(skip(self), name = "brapi::fetch_universe")]
    async fn fetch_universe(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/quote/list", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&self.token_params())
            .send()
            .await
            .context("GET /api/quote/list request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("brapi GET /api/quote/list returned {status}: {body}");
        }

        let listing: ListResponse = resp
            .json()
            .await
            .context("failed to parse listing response")?;

        let universe = filter_universe(listing.stocks, &self.suffixes);
        debug!(count = universe.len(), "universe fetched");
        Ok(universe)
    }
}

impl HistorySource for BrapiClient {
    /// One batch quote request with daily interval over the lookback range.
    #[instrument(skip(self, symbols), name = "brapi::fetch_daily_history")]
    async fn fetch_daily_history(
        &self,
        symbols: &[String],
        lookback_days: u32,
    ) -> Result<HashMap<String, PriceSeries>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let range = Self::range_for_days(lookback_days);
        let resp = self
            .get_quotes(
                symbols,
                &[
                    ("range", range.to_string()),
                    ("interval", "1d".to_string()),
                ],
            )
            .await?;

        let mut map = HashMap::new();
        for result in resp.results {
            if let Some(series) = series_from_result(result) {
                map.insert(series.symbol.clone(), series);
            }
        }

        debug!(requested = symbols.len(), received = map.len(), range, "daily history fetched");
        Ok(map)
    }
}

impl IntradaySource for BrapiClient {
    /// One batch quote request; only the latest traded price is kept.
    #[instrument(skip(self, symbols), name = "brapi::fetch_latest_prices")]
    async fn fetch_latest_prices(&self, symbols: &[String]) -> Result<HashMap<String, f64>> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        let resp = self.get_quotes(symbols, &[]).await?;

        let mut map = HashMap::new();
        for result in resp.results {
            match result.regular_market_price {
                Some(price) if price.is_finite() => {
                    map.insert(result.symbol, price);
                }
                _ => {
                    debug!(symbol = %result.symbol, "no intraday price in response");
                }
            }
        }

        debug!(requested = symbols.len(), received = map.len(), "intraday prices fetched");
        Ok(map)
    }
}

impl std::fmt::Debug for BrapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrapiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("suffixes", &self.suffixes)
            .finish()
    }
}
