// =============================================================================
// Indicator Frame — aligned per-bar indicator columns for one ticker
// =============================================================================

use crate::config::StrategyParams;
use crate::types::PriceSeries;

use super::ema::calculate_ema;
use super::rsi::calculate_rsi;
use super::volume::calculate_volume_sma;

/// Per-bar indicator values derived from a [`PriceSeries`].
///
/// Every column has the same length and date alignment as the source series.
/// Positions without sufficient history are `None` (RSI at index 0, the
/// volume average before its window fills). An empty or unusable series
/// produces an empty frame rather than an error, so one broken ticker can
/// never abort a batch.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub short_ema: Vec<f64>,
    pub long_ema: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub avg_volume: Vec<Option<f64>>,
}

impl IndicatorFrame {
    /// Compute all indicator columns for `series` under `params`.
    pub fn compute(series: &PriceSeries, params: &StrategyParams) -> Self {
        if series.is_empty() {
            return Self::default();
        }

        let closes = series.closes();
        let volumes = series.volumes();

        let short_ema = calculate_ema(&closes, params.short_ema_span);
        let long_ema = calculate_ema(&closes, params.long_ema_span);

        // A truncated EMA means the closes were unusable; treat the whole
        // ticker as having no indicators.
        if short_ema.len() != closes.len() || long_ema.len() != closes.len() {
            return Self::default();
        }

        Self {
            short_ema,
            long_ema,
            rsi: calculate_rsi(&closes, params.rsi_period),
            avg_volume: calculate_volume_sma(&volumes, params.volume_avg_period),
        }
    }

    pub fn len(&self) -> usize {
        self.short_ema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_ema.is_empty()
    }
}
