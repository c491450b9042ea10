// =============================================================================
// Relative Strength Index (RSI) — Wilder-style smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split into gains (max(delta, 0)) and losses (max(-delta, 0)).
// Step 3 — Smooth each stream with alpha = 1/period (center of mass
//          period - 1), seeded at the first delta:
//            avg = prev_avg + alpha * (current - prev_avg)
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Numeric edge policy:
//   avg_loss == 0, avg_gain > 0  =>  RSI = 100 (RS would be infinite)
//   avg_loss == 0, avg_gain == 0 =>  RSI = 50  (flat series, formula undefined)
// The result is always clamped to [0, 100].
// =============================================================================

/// Compute the RSI series aligned with `closes`.
///
/// The output has the same length as the input. Index 0 is `None` (there is
/// no delta yet); every later index carries a value, including bars where a
/// non-finite input forces the neutral policy off — those are also `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.is_empty() {
        return vec![None; closes.len()];
    }

    let alpha = 1.0 / period as f64;

    let mut result = Vec::with_capacity(closes.len());
    result.push(None); // No delta at the first bar.

    let mut avg_gain = 0.0_f64;
    let mut avg_loss = 0.0_f64;
    let mut seeded = false;

    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        if !delta.is_finite() {
            result.push(None);
            continue;
        }

        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        if !seeded {
            avg_gain = gain;
            avg_loss = loss;
            seeded = true;
        } else {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        }

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // No movement at all — neutral.
    } else if avg_loss == 0.0 {
        100.0 // All gains, no losses.
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_aligned_with_input() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), closes.len());
        assert!(series[0].is_none());
        assert!(series[1..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_flat_market_is_neutral_50() {
        // No price change at all => RSI = 50, never NaN.
        let closes = vec![100.0; 30];
        let series = calculate_rsi(&closes, 14);
        for v in series.iter().skip(1) {
            let v = v.expect("flat series must still produce a value");
            assert!((v - 50.0).abs() < 1e-12, "expected 50.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_gains_is_100() {
        // Strictly ascending prices => no losses => RSI = 100, never infinite.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for v in series.iter().skip(1) {
            let v = v.unwrap();
            assert!((v - 100.0).abs() < 1e-12, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for v in series.iter().skip(1) {
            let v = v.unwrap();
            assert!(v.abs() < 1e-12, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        // Arbitrary data — RSI must always be in [0, 100].
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in calculate_rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_matches_smoothing_recurrence() {
        // One loss of 10 then one gain of 20 on top of a flat base. The
        // averages at the last bar follow directly from the recurrence:
        //   avg_gain = 20/14, avg_loss = (13/14) * (10/14).
        let mut closes = vec![100.0; 28];
        closes.push(90.0); // delta -10
        closes.push(110.0); // delta +20
        let series = calculate_rsi(&closes, 14);

        // Bar 28: only a loss so far => RSI 0.
        assert!(series[28].unwrap().abs() < 1e-12);

        // Bar 29: avg_gain = 20/14, avg_loss = (13/14) * (10/14).
        let avg_gain = 20.0 / 14.0;
        let avg_loss = (13.0 / 14.0) * (10.0 / 14.0);
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((series[29].unwrap() - expected).abs() < 1e-10);
        // Sanity: this sits below the 70 overbought ceiling.
        assert!(series[29].unwrap() < 70.0);
    }

    #[test]
    fn rsi_period_zero_is_undefined() {
        let series = calculate_rsi(&[1.0, 2.0, 3.0], 0);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(Option::is_none));
    }
}
