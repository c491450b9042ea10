// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// scanner. Columns that need warm-up history return `Option<f64>` per bar so
// callers are forced to handle insufficient-data positions.

pub mod ema;
pub mod frame;
pub mod rsi;
pub mod volume;

pub use frame::IndicatorFrame;
