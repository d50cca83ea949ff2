//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators over a single input series.
///
/// `calculate` returns one value per input point from the first point
/// where the indicator is defined onward, so the last element always
/// corresponds to the last input.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output: Copy;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically close prices, oldest first)
    ///
    /// # Returns
    /// A vector of indicator values, empty when `data` is too short
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value aligned to the last data point, if defined.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.validate_data(data).ok()?;
        self.calculate(data).last().copied()
    }

    /// Fail with `InsufficientData` when `data` is shorter than `period()`.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        require_len(self.period(), data.len())
    }
}

fn require_len(required: usize, available: usize) -> Result<(), IndicatorError> {
    if available < required {
        Err(IndicatorError::InsufficientData { required, available })
    } else {
        Ok(())
    }
}

/// Indicator producing several aligned values per point (Bollinger Bands, MACD).
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs: Copy;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Outputs aligned to the last data point, if defined.
    fn latest(&self, data: &[f64]) -> Option<Self::Outputs> {
        self.validate_data(data).ok()?;
        self.calculate(data).last().copied()
    }

    /// Fail with `InsufficientData` when `data` is shorter than `period()`.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        require_len(self.period(), data.len())
    }
}
