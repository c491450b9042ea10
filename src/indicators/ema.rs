// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha = 2 / (span + 1)
//   EMA_0 = close_0
//   EMA_t = EMA_{t-1} + alpha * (close_t - EMA_{t-1})
//
// The series is seeded with the first close, so a value exists for every
// input bar. Early values are low-confidence; the signal detector enforces
// its own minimum-history gate before trusting them.
// =============================================================================

/// Compute the EMA series for the given `closes` slice and `span`.
///
/// The output always has the same length as the input, with
/// `ema[0] == closes[0]` exactly.
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` => empty vec (degenerate smoothing factor)
/// - a non-finite close truncates the series; downstream consumers should
///   not trust a broken tail.
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || closes.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let seed = closes[0];
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len());
    result.push(seed);

    let mut prev = seed;
    for &close in &closes[1..] {
        let ema = prev + alpha * (close - prev);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}
