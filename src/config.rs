// =============================================================================
// Scan Configuration — strategy parameters and universe settings
// =============================================================================
//
// Every tunable constant of the scanner lives in one immutable value that is
// passed into the indicator engine and the signal detector, so alternative
// parameterisations can be tested without global state.
//
// All fields carry `#[serde(default)]` so that a partial JSON file (or an
// empty one) still deserialises to a working configuration.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_short_ema_span() -> usize {
    12
}

fn default_long_ema_span() -> usize {
    26
}

fn default_rsi_period() -> usize {
    14
}

fn default_volume_avg_period() -> usize {
    10
}

fn default_volume_multiplier() -> f64 {
    1.2
}

fn default_rsi_ceiling() -> f64 {
    70.0
}

fn default_stop_loss_lookback() -> usize {
    15
}

fn default_lookback_days() -> u32 {
    120
}

fn default_universe_suffixes() -> Vec<String> {
    // BDR ticker suffixes on B3: 34 (most programs), 35 and 39.
    vec!["34".to_string(), "35".to_string(), "39".to_string()]
}

// =============================================================================
// StrategyParams
// =============================================================================

/// Parameters of the crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Span of the fast EMA.
    #[serde(default = "default_short_ema_span")]
    pub short_ema_span: usize,

    /// Span of the slow EMA. Also the minimum history (in bars) a ticker
    /// needs before it is eligible for signal detection.
    #[serde(default = "default_long_ema_span")]
    pub long_ema_span: usize,

    /// RSI look-back period.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Window of the trailing volume average.
    #[serde(default = "default_volume_avg_period")]
    pub volume_avg_period: usize,

    /// Signal-bar volume must exceed the volume average times this factor.
    #[serde(default = "default_volume_multiplier")]
    pub volume_multiplier: f64,

    /// RSI at or above this level blocks the signal (overbought).
    #[serde(default = "default_rsi_ceiling")]
    pub rsi_ceiling: f64,

    /// Trailing window (bars, inclusive of the signal bar) for the
    /// stop-loss reference low.
    #[serde(default = "default_stop_loss_lookback")]
    pub stop_loss_lookback: usize,
}

impl StrategyParams {
    /// Minimum number of bars a series must have to be evaluated.
    pub fn min_history(&self) -> usize {
        self.long_ema_span
    }
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_ema_span: default_short_ema_span(),
            long_ema_span: default_long_ema_span(),
            rsi_period: default_rsi_period(),
            volume_avg_period: default_volume_avg_period(),
            volume_multiplier: default_volume_multiplier(),
            rsi_ceiling: default_rsi_ceiling(),
            stop_loss_lookback: default_stop_loss_lookback(),
        }
    }
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Top-level configuration for one scanner run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// How many calendar days of daily history to request.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Ticker suffixes that define the depositary-receipt universe.
    #[serde(default = "default_universe_suffixes")]
    pub universe_suffixes: Vec<String>,

    /// Crossover strategy parameters.
    #[serde(default)]
    pub strategy: StrategyParams,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            universe_suffixes: default_universe_suffixes(),
            strategy: StrategyParams::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(
            path = %path.display(),
            lookback_days = config.lookback_days,
            suffixes = ?config.universe_suffixes,
            "scan config loaded"
        );

        Ok(config)
    }
}
