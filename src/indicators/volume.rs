// =============================================================================
// Trailing Volume Average
// =============================================================================
//
// Simple moving average of volume over the trailing `period` bars, inclusive
// of the current bar. Used to confirm that a crossover happened on above-
// average participation rather than in a quiet market.
// =============================================================================

/// Compute the trailing simple moving average of `volumes`.
///
/// The output is aligned with the input: the first `period - 1` entries are
/// `None` (not enough history for a full window), every later entry is the
/// mean of the `period` volumes ending at that index.
pub fn calculate_volume_sma(volumes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; volumes.len()];
    }

    let mut result = Vec::with_capacity(volumes.len());
    let mut window_sum = 0.0_f64;

    for (i, &v) in volumes.iter().enumerate() {
        window_sum += v;
        if i >= period {
            window_sum -= volumes[i - period];
        }

        if i + 1 >= period && window_sum.is_finite() {
            result.push(Some(window_sum / period as f64));
        } else {
            result.push(None);
        }
    }

    result
}
