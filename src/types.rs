// =============================================================================
// Shared types used across the BDR Scout scanner
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar for one ticker.
///
/// Immutable once retrieved from the data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// A bar is usable only when every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Chronologically ordered daily bars for a single ticker.
///
/// Invariant: dates are strictly increasing, no duplicates. The constructor
/// enforces this by sorting and keeping the first bar seen for each date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from unordered bars, dropping non-finite bars and
    /// duplicate dates.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.retain(Bar::is_finite);
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes in chronological order.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Lowest low over the trailing `window` bars ending at the last bar
    /// (inclusive). `None` on an empty series or a zero window.
    pub fn trailing_min_low(&self, window: usize) -> Option<f64> {
        if window == 0 || self.bars.is_empty() {
            return None;
        }
        let start = self.bars.len().saturating_sub(window);
        self.bars[start..]
            .iter()
            .map(|b| b.low)
            .fold(None, |acc: Option<f64>, low| match acc {
                Some(m) if m <= low => Some(m),
                _ => Some(low),
            })
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64, low: f64, volume: f64) -> Bar {
        Bar {
            date,
            open: close,
            high: close,
            low,
            close,
            volume,
        }
    }

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(n)
    }

    #[test]
    fn series_sorts_and_dedups_dates() {
        let bars = vec![
            bar(day(2), 3.0, 3.0, 100.0),
            bar(day(0), 1.0, 1.0, 100.0),
            bar(day(2), 9.0, 9.0, 100.0), // duplicate date, dropped
            bar(day(1), 2.0, 2.0, 100.0),
        ];
        let series = PriceSeries::new("AAPL34", bars);
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.bars()[2].close, 3.0);
    }

    #[test]
    fn series_drops_non_finite_bars() {
        let bars = vec![
            bar(day(0), 1.0, 1.0, 100.0),
            bar(day(1), f64::NAN, 1.0, 100.0),
            bar(day(2), 3.0, 3.0, f64::INFINITY),
        ];
        let series = PriceSeries::new("MSFT34", bars);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn trailing_min_low_respects_window() {
        let bars = vec![
            bar(day(0), 10.0, 1.0, 100.0), // oldest low, outside window
            bar(day(1), 10.0, 5.0, 100.0),
            bar(day(2), 10.0, 4.0, 100.0),
            bar(day(3), 10.0, 6.0, 100.0),
        ];
        let series = PriceSeries::new("GOGL34", bars);
        assert_eq!(series.trailing_min_low(3), Some(4.0));
        // Window larger than the series covers everything.
        assert_eq!(series.trailing_min_low(10), Some(1.0));
        assert_eq!(series.trailing_min_low(0), None);
    }

    #[test]
    fn trailing_min_low_empty_series() {
        let series = PriceSeries::new("AMZO34", Vec::new());
        assert!(series.trailing_min_low(5).is_none());
        assert!(series.is_empty());
    }
}
