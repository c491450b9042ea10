// =============================================================================
// Signal Detector — bullish EMA crossover with volume and momentum gates
// =============================================================================
//
// Evaluates only the latest bar of a ticker's series. A potential buy signal
// fires when all three hold on that bar:
//   1. Crossover:   prev short EMA <= prev long EMA  AND  short EMA > long EMA
//   2. Volume:      volume > trailing average * multiplier
//   3. Momentum:    RSI below the overbought ceiling
//
// At most one signal per ticker per run.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::StrategyParams;
use crate::indicators::IndicatorFrame;
use crate::types::PriceSeries;

/// A potential buy signal awaiting intraday confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct PotentialSignal {
    pub symbol: String,
    pub signal_date: NaiveDate,
    /// Close of the signal bar.
    pub entry_price_ref: f64,
    /// Lowest low over the trailing stop-loss window ending at the signal bar.
    pub stop_loss_ref: f64,
    /// Fast EMA at the signal bar; the intraday confirmation target.
    pub short_ema_at_signal: f64,
}

/// Evaluate the latest bar of `series` against the crossover rules.
///
/// Returns `None` (never an error) when the ticker does not qualify:
/// fewer than `params.min_history()` bars, indicators undefined at the
/// evaluated bars, or any gate failing. Per-ticker isolation is the point —
/// a skip here must not disturb the rest of the batch.
pub fn detect_signal(
    series: &PriceSeries,
    frame: &IndicatorFrame,
    params: &StrategyParams,
) -> Option<PotentialSignal> {
    let n = series.len();
    if n < params.min_history() || frame.len() != n {
        return None;
    }

    let cur = n - 1;
    let prev = n - 2;

    // 1. Crossover: from at-or-below to strictly above, at this bar exactly.
    let crossed = frame.short_ema[prev] <= frame.long_ema[prev]
        && frame.short_ema[cur] > frame.long_ema[cur];
    if !crossed {
        return None;
    }

    let bar = &series.bars()[cur];

    // 2. Volume confirmation.
    let avg_volume = frame.avg_volume[cur]?;
    if bar.volume <= avg_volume * params.volume_multiplier {
        debug!(
            symbol = %series.symbol,
            volume = bar.volume,
            avg_volume,
            "crossover without volume confirmation — skipped"
        );
        return None;
    }

    // 3. Momentum filter: exclude overbought conditions.
    let rsi = frame.rsi[cur]?;
    if rsi >= params.rsi_ceiling {
        debug!(symbol = %series.symbol, rsi, "crossover in overbought zone — skipped");
        return None;
    }

    let stop_loss_ref = series.trailing_min_low(params.stop_loss_lookback)?;

    debug!(
        symbol = %series.symbol,
        date = %bar.date,
        close = bar.close,
        rsi,
        stop_loss_ref,
        "potential buy signal"
    );

    Some(PotentialSignal {
        symbol: series.symbol.clone(),
        signal_date: bar.date,
        entry_price_ref: bar.close,
        stop_loss_ref,
        short_ema_at_signal: frame.short_ema[cur],
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(n)
    }

    fn bar(i: u64, close: f64, low: f64, volume: f64) -> Bar {
        Bar {
            date: day(i),
            open: close,
            high: close,
            low,
            close,
            volume,
        }
    }

    /// Flat base at 100, one down bar, then a rally bar that forces the fast
    /// EMA over the slow one exactly at the last index. With both EMAs flat
    /// at 100 beforehand the arithmetic is exact:
    ///   dip bar:   short = 100 - 10 * 2/13 < long = 100 - 10 * 2/27
    ///   rally bar: short recovers faster and finishes above long.
    /// The dip also seeds enough loss to keep RSI below the 70 ceiling.
    fn crossover_series(len: usize, last_volume: f64) -> PriceSeries {
        assert!(len >= 12);
        let mut bars: Vec<Bar> = (0..len as u64 - 2)
            .map(|i| bar(i, 100.0, 99.0, 1000.0))
            .collect();
        bars.push(bar(len as u64 - 2, 90.0, 89.5, 1000.0));
        bars.push(bar(len as u64 - 1, 110.0, 105.0, last_volume));
        PriceSeries::new("TEST34", bars)
    }

    fn detect(series: &PriceSeries) -> Option<PotentialSignal> {
        let params = StrategyParams::default();
        let frame = IndicatorFrame::compute(series, &params);
        detect_signal(series, &frame, &params)
    }

    #[test]
    fn fires_on_engineered_crossover() {
        let series = crossover_series(30, 5000.0);
        let signal = detect(&series).expect("signal should fire");

        assert_eq!(signal.symbol, "TEST34");
        assert_eq!(signal.signal_date, day(29));
        assert_eq!(signal.entry_price_ref, 110.0);
        // Min low over bars 15..=29: flat lows 99.0 except the dip at 89.5.
        assert_eq!(signal.stop_loss_ref, 89.5);
        // Fast EMA after the dip-and-rally: above the slow one, below price.
        assert!(signal.short_ema_at_signal > 100.0);
        assert!(signal.short_ema_at_signal < 110.0);
    }

    #[test]
    fn short_ema_at_signal_matches_recurrence() {
        let series = crossover_series(30, 5000.0);
        let signal = detect(&series).unwrap();

        let alpha = 2.0 / 13.0;
        let mut ema = 100.0; // flat through bar 27
        ema += alpha * (90.0 - ema);
        ema += alpha * (110.0 - ema);
        assert!((signal.short_ema_at_signal - ema).abs() < 1e-10);
    }

    #[test]
    fn never_fires_below_min_history() {
        // 25 bars < 26 required: skipped even though the shape would cross.
        let series = crossover_series(25, 5000.0);
        assert!(detect(&series).is_none());
    }

    #[test]
    fn exactly_min_history_is_eligible() {
        let series = crossover_series(26, 5000.0);
        assert!(detect(&series).is_some());
    }

    #[test]
    fn no_signal_when_fast_ema_stays_above() {
        // Steady uptrend: the fast EMA is already above the slow one on the
        // previous bar, so no *crossover* happens at the last bar.
        let bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 100.0 + i as f64, 99.0, 5000.0))
            .collect();
        let series = PriceSeries::new("UP34", bars);
        assert!(detect(&series).is_none());
    }

    #[test]
    fn no_signal_when_fast_ema_stays_below() {
        // Steady downtrend: short EMA never rises above the long EMA.
        let bars: Vec<Bar> = (0..30)
            .map(|i| bar(i, 200.0 - i as f64, 99.0, 5000.0))
            .collect();
        let series = PriceSeries::new("DOWN34", bars);
        assert!(detect(&series).is_none());
    }

    #[test]
    fn crossover_fires_exactly_once_over_the_series() {
        // Walk the engineered series bar by bar: the two-bar crossover
        // predicate must hold at the final bar and nowhere else.
        let series = crossover_series(30, 5000.0);
        let params = StrategyParams::default();
        let frame = IndicatorFrame::compute(&series, &params);

        let crossings: Vec<usize> = (1..frame.len())
            .filter(|&t| {
                frame.short_ema[t - 1] <= frame.long_ema[t - 1]
                    && frame.short_ema[t] > frame.long_ema[t]
            })
            .collect();
        assert_eq!(crossings, vec![29]);
    }

    #[test]
    fn volume_gate_blocks_quiet_crossover() {
        // Same shape, but the signal bar trades at the 10-bar average:
        // 1000 is not > avg * 1.2.
        let series = crossover_series(30, 1000.0);
        assert!(detect(&series).is_none());
    }

    #[test]
    fn momentum_gate_blocks_overbought_crossover() {
        // Flat base then a pure rally bar: no losses at all, RSI = 100.
        let mut bars: Vec<Bar> = (0..29).map(|i| bar(i, 100.0, 99.0, 1000.0)).collect();
        bars.push(bar(29, 110.0, 105.0, 5000.0));
        let series = PriceSeries::new("HOT34", bars);

        let params = StrategyParams::default();
        let frame = IndicatorFrame::compute(&series, &params);
        // The crossover itself is there; only the RSI ceiling blocks it.
        assert!(frame.short_ema[29] > frame.long_ema[29]);
        assert_eq!(frame.rsi[29], Some(100.0));
        assert!(detect_signal(&series, &frame, &params).is_none());
    }

    #[test]
    fn stop_loss_ignores_lows_outside_window() {
        // A much deeper low sits at bar 3, outside the trailing 15-bar
        // window ending at bar 29.
        let mut bars: Vec<Bar> = (0..28).map(|i| bar(i, 100.0, 99.0, 1000.0)).collect();
        bars[3].low = 80.0;
        bars.push(bar(28, 90.0, 89.5, 1000.0));
        bars.push(bar(29, 110.0, 105.0, 5000.0));
        let series = PriceSeries::new("TEST34", bars);

        let signal = detect(&series).expect("signal should fire");
        assert_eq!(signal.stop_loss_ref, 89.5);
    }
}
