// =============================================================================
// Signals Module
// =============================================================================
//
// The two-stage decision process of the scanner:
// - detector: crossover + volume + momentum gates on the latest daily bar
// - confirm:  same-day intraday re-check splitting signals into
//   confirmed vs. radar

pub mod confirm;
pub mod detector;

pub use confirm::{confirm_signals, ConfirmationResult, SignalOutcome};
pub use detector::{detect_signal, PotentialSignal};
