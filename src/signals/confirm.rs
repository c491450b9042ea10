// =============================================================================
// Intraday Confirmer — splits potential signals into confirmed vs. radar
// =============================================================================
//
// A potential signal is confirmed only when a same-day intraday price exists
// for its ticker AND that price is strictly above the fast EMA value that
// triggered the signal — i.e. price is still above the trend line. Everything
// else (price missing, whole intraday batch empty, lookup failure) degrades
// the signal to "radar": still reported, not acted on.
// =============================================================================

use std::collections::HashMap;

use tracing::debug;

use super::detector::PotentialSignal;

/// Per-signal classification outcome.
///
/// Modelling the two-way split as an enum keeps the partition total and
/// disjoint by construction: one outcome per input signal, no signal in both
/// camps.
#[derive(Debug, Clone)]
pub enum SignalOutcome {
    Confirmed(PotentialSignal),
    Radar(PotentialSignal),
}

impl SignalOutcome {
    /// Classify one signal against an optional intraday price.
    pub fn classify(signal: PotentialSignal, intraday_price: Option<f64>) -> Self {
        match intraday_price {
            Some(price) if price > signal.short_ema_at_signal => Self::Confirmed(signal),
            Some(price) => {
                debug!(
                    symbol = %signal.symbol,
                    price,
                    short_ema = signal.short_ema_at_signal,
                    "intraday price back under the trend line — radar"
                );
                Self::Radar(signal)
            }
            None => {
                debug!(symbol = %signal.symbol, "no intraday price — radar");
                Self::Radar(signal)
            }
        }
    }
}

/// The confirmed / radar partition of one run's potential signals.
///
/// Both lists preserve detection order. Every input signal lands in exactly
/// one list.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationResult {
    pub confirmed: Vec<PotentialSignal>,
    pub radar: Vec<PotentialSignal>,
}

impl ConfirmationResult {
    pub fn total(&self) -> usize {
        self.confirmed.len() + self.radar.len()
    }
}

/// Classify every potential signal against the intraday price map.
///
/// An empty map (the provider returned nothing for the batch) degrades all
/// signals to radar; none are dropped and none confirm by default.
pub fn confirm_signals(
    signals: Vec<PotentialSignal>,
    intraday_prices: &HashMap<String, f64>,
) -> ConfirmationResult {
    let mut result = ConfirmationResult::default();

    for signal in signals {
        let price = intraday_prices.get(&signal.symbol).copied();
        match SignalOutcome::classify(signal, price) {
            SignalOutcome::Confirmed(s) => result.confirmed.push(s),
            SignalOutcome::Radar(s) => result.radar.push(s),
        }
    }

    result
}
