//! Core data types for the signal pipeline.

mod instrument;
mod ohlcv;
mod signal;
mod snapshot;
mod timeframe;

pub use instrument::{AssetClass, Instrument, TradeMode, Venue};
pub use ohlcv::{Bar, Series};
pub use signal::{Recommendation, SignalAction, SignalRequest, SignalResponse};
pub use snapshot::{IndicatorSnapshot, Reading, NOT_AVAILABLE};
pub use timeframe::Timeframe;
