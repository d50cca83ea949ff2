//! OHLCV bars and the bounded series built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timeframe;

/// One OHLCV sample. Prices are f64 for indicator math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds (candle open time)
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar that only knows a closing rate (forex quotes).
    ///
    /// All four prices are set to the rate and volume is zero.
    pub fn close_only(timestamp: i64, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Chronological bars for one instrument, oldest first.
///
/// The series never grows beyond `max_len`; when built from a longer
/// input the oldest bars are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Symbol the bars belong to
    pub symbol: String,
    /// Candle interval
    pub timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl Series {
    /// Default number of candles requested from crypto venues.
    pub const DEFAULT_LIMIT: usize = 50;

    /// Create an empty series.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Build a series, sorting by timestamp and keeping the newest `max_len` bars.
    pub fn from_bars(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        mut bars: Vec<Bar>,
        max_len: usize,
    ) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        if bars.len() > max_len {
            bars.drain(..bars.len() - max_len);
        }
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 10.0)
    }

    #[test]
    fn test_from_bars_sorts_and_truncates() {
        let bars = vec![bar(3, 103.0), bar(1, 101.0), bar(4, 104.0), bar(2, 102.0)];
        let series = Series::from_bars("BTCUSDT", Timeframe::Hour1, bars, 3);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![102.0, 103.0, 104.0]);
        assert_eq!(series.last().unwrap().timestamp, 4);
    }

    #[test]
    fn test_empty_series() {
        let series = Series::empty("ETHUSDT", Timeframe::Hour1);
        assert!(series.is_empty());
        assert!(series.last().is_none());
        assert!(series.closes().is_empty());
    }

    #[test]
    fn test_close_only_bar() {
        let bar = Bar::close_only(1_700_000_000_000, 151.25);
        assert_eq!(bar.open, 151.25);
        assert_eq!(bar.high, 151.25);
        assert_eq!(bar.low, 151.25);
        assert_eq!(bar.volume, 0.0);
        assert!(bar.datetime().is_some());
    }
}
