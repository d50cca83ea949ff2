//! Moving average indicators.

use signal_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        let mut sum: f64 = data[..self.period].iter().sum();
        result.push(sum / period_f64);

        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Run an exponential smoothing pass over every input point.
///
/// The recursion is seeded with the first value and never reset:
/// `s[0] = x[0]`, `s[i] = alpha * x[i] + (1 - alpha) * s[i-1]`.
pub(crate) fn exponential_smooth(data: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(data.len());
    let mut state: Option<f64> = None;

    for &value in data {
        let next = match state {
            None => value,
            Some(prev) => alpha * value + (1.0 - alpha) * prev,
        };
        state = Some(next);
        result.push(next);
    }

    result
}

/// Exponential Moving Average (EMA).
///
/// Uses `alpha = 2 / (period + 1)`, seeded with the first price rather
/// than an SMA, and reports values only once `period` prices have been
/// seen. Earlier points are part of the recursion but not of the output.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let alpha = 2.0 / (period as f64 + 1.0);
        Self { period, alpha }
    }

    /// Smoothed values for every input point, including the warm-up.
    pub(crate) fn full(&self, data: &[f64]) -> Vec<f64> {
        exponential_smooth(data, self.alpha)
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.period {
            return vec![];
        }

        let mut smoothed = self.full(data);
        smoothed.drain(..self.period - 1);
        smoothed
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
