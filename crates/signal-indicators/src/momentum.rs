//! Momentum indicators.

use serde::{Deserialize, Serialize};
use signal_core::traits::{Indicator, MultiOutputIndicator};

use crate::moving_average::{exponential_smooth, Ema};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
///
/// Gains and losses are smoothed with Wilder's factor `1 / period`. The
/// first change is taken as zero and seeds the recursion, so the first
/// value is reported after `period` prices. A flat window (no gains and
/// no losses) reads 50.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    fn value(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());
        gains.push(0.0);
        losses.push(0.0);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gains = exponential_smooth(&gains, alpha);
        let avg_losses = exponential_smooth(&losses, alpha);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .skip(self.period - 1)
            .map(|(&gain, &loss)| Self::value(gain, loss))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD), once enough MACD values exist
    pub signal: Option<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Option<f64>,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum. The MACD line
/// is defined as soon as the slow EMA is; the signal line needs a further
/// `signal_period - 1` points.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        if data.len() < self.slow_period {
            return vec![];
        }

        let fast = self.fast.full(data);
        let slow = self.slow.full(data);

        let macd_line: Vec<f64> = fast
            .iter()
            .zip(slow.iter())
            .skip(self.slow_period - 1)
            .map(|(f, s)| f - s)
            .collect();

        let alpha = 2.0 / (self.signal_period as f64 + 1.0);
        let signal_line = exponential_smooth(&macd_line, alpha);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .enumerate()
            .map(|(i, (&macd, &signal))| {
                let signal = (i + 1 >= self.signal_period).then_some(signal);
                MacdOutput {
                    macd,
                    signal,
                    histogram: signal.map(|s| macd - s),
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.slow_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 5.0 * (i as f64 * 0.3).sin() + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), 17);

        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_reference_values() {
        let rsi = Rsi::default();
        let data = wave(60);

        assert!((rsi.latest(&data).unwrap() - 38.941610740073976).abs() < 1e-9);
        assert!((rsi.latest(&data[..14]).unwrap() - 28.452436088780246).abs() < 1e-9);
        assert!(rsi.latest(&data[..13]).is_none());
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let rsi = Rsi::default();
        let data = vec![100.0; 30];
        assert_eq!(rsi.latest(&data), Some(50.0));
    }

    #[test]
    fn test_rsi_is_idempotent() {
        let rsi = Rsi::default();
        let data = wave(50);
        assert_eq!(rsi.calculate(&data), rsi.calculate(&data));
    }

    #[test]
    fn test_macd_line_available_from_slow_period() {
        let macd = Macd::new();
        let data = wave(60);

        assert!(macd.latest(&data[..25]).is_none());

        let first = macd.latest(&data[..26]).unwrap();
        assert!(first.signal.is_none());
        assert!(first.histogram.is_none());

        let last = macd.latest(&data).unwrap();
        assert!((last.macd - -0.5610854383894548).abs() < 1e-9);
        assert!(last.signal.is_some());
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 25);
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_custom_periods() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(result.len(), 21);
        assert!(result[1].signal.is_none());
        assert!(result[2].signal.is_some());
    }
}
