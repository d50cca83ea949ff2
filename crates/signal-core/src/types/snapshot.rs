//! Indicator snapshot for the most recent bar.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering used wherever an indicator could not be computed.
pub const NOT_AVAILABLE: &str = "not available";

/// Indicator values aligned to the last bar of a series.
///
/// `None` means the series was too short for that indicator. It is never
/// replaced by zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Open time of the bar the values refer to (Unix ms)
    pub timestamp: i64,
    /// Close of that bar
    pub close: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
    pub bollinger_high: Option<f64>,
    pub bollinger_low: Option<f64>,
}

impl IndicatorSnapshot {
    /// Named readings in prompt order.
    pub fn readings(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("RSI", self.rsi),
            ("MACD", self.macd),
            ("EMA-50", self.ema_50),
            ("EMA-200", self.ema_200),
            ("Bollinger High", self.bollinger_high),
            ("Bollinger Low", self.bollinger_low),
        ]
    }

    /// Number of indicators that could be computed.
    pub fn available_count(&self) -> usize {
        self.readings().iter().filter(|(_, v)| v.is_some()).count()
    }
}

/// Display adapter that renders `None` as [`NOT_AVAILABLE`].
#[derive(Debug, Clone, Copy)]
pub struct Reading(pub Option<f64>);

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, value),
                None => write!(f, "{}", value),
            },
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}
