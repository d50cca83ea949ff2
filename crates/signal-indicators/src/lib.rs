//! Technical indicators for the signal pipeline.
//!
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (standard deviation, Bollinger Bands)
//!
//! [`IndicatorEngine`] combines them into the last-bar
//! [`IndicatorSnapshot`](signal_core::types::IndicatorSnapshot) handed to
//! the inference service.

pub mod engine;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use engine::IndicatorEngine;
pub use momentum::{Macd, MacdOutput, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
