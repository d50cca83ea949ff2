//! Last-bar indicator snapshot.

use signal_core::traits::{Indicator, MultiOutputIndicator};
use signal_core::types::{IndicatorSnapshot, Series};
use tracing::debug;

use crate::momentum::{Macd, Rsi};
use crate::moving_average::Ema;
use crate::volatility::BollingerBands;

/// Computes the fixed indicator set for the most recent bar of a series.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    rsi: Rsi,
    macd: Macd,
    ema_fast: Ema,
    ema_slow: Ema,
    bollinger: BollingerBands,
}

impl IndicatorEngine {
    /// RSI(14), MACD(12, 26, 9), EMA-50, EMA-200 and Bollinger(20, 2).
    pub fn new() -> Self {
        Self {
            rsi: Rsi::new(14),
            macd: Macd::new(),
            ema_fast: Ema::new(50),
            ema_slow: Ema::new(200),
            bollinger: BollingerBands::new(),
        }
    }

    /// Snapshot of every indicator at the last bar.
    ///
    /// Returns `None` for an empty series. Indicators whose history
    /// requirement is not met are `None` inside the snapshot.
    pub fn analyze(&self, series: &Series) -> Option<IndicatorSnapshot> {
        let last = series.last()?;
        let closes = series.closes();

        let bands = self.bollinger.latest(&closes);
        let snapshot = IndicatorSnapshot {
            timestamp: last.timestamp,
            close: last.close,
            rsi: finite(self.rsi.latest(&closes)),
            macd: finite(self.macd.latest(&closes).map(|m| m.macd)),
            ema_50: finite(self.ema_fast.latest(&closes)),
            ema_200: finite(self.ema_slow.latest(&closes)),
            bollinger_high: finite(bands.map(|b| b.upper)),
            bollinger_low: finite(bands.map(|b| b.lower)),
        };

        debug!(
            symbol = %series.symbol,
            bars = series.len(),
            available = snapshot.available_count(),
            "Indicators computed"
        );

        Some(snapshot)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
