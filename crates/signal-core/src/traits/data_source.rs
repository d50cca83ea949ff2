//! Market data source trait definition.

use crate::error::FetchError;
use crate::types::{Instrument, Series, TradeMode};
use async_trait::async_trait;

/// Trait for providers of recent price history.
///
/// Implementations hold no state between calls other than their HTTP
/// client and configuration.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the most recent bars for an instrument.
    ///
    /// # Arguments
    /// * `instrument` - The instrument to fetch
    /// * `mode` - Spot, futures or forex market
    /// * `limit` - Maximum number of bars (forex sources always return one)
    ///
    /// # Returns
    /// A non-empty series ordered from oldest to newest, or the reason
    /// no series could be produced
    async fn fetch(
        &self,
        instrument: &Instrument,
        mode: TradeMode,
        limit: usize,
    ) -> Result<Series, FetchError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, Timeframe};

    struct FixedSource {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl MarketDataSource for FixedSource {
        async fn fetch(
            &self,
            instrument: &Instrument,
            _mode: TradeMode,
            limit: usize,
        ) -> Result<Series, FetchError> {
            if self.closes.is_empty() {
                return Err(FetchError::Empty);
            }
            let bars = self
                .closes
                .iter()
                .enumerate()
                .map(|(i, c)| Bar::new(i as i64, *c, *c, *c, *c, 1.0))
                .collect();
            Ok(Series::from_bars(instrument.id(), Timeframe::Hour1, bars, limit))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_source_respects_limit() {
        let source = FixedSource {
            closes: vec![1.0, 2.0, 3.0, 4.0],
        };
        let btc = Instrument::crypto("BTCUSDT").unwrap();
        let series = source.fetch(&btc, TradeMode::Spot, 2).await.unwrap();
        assert_eq!(series.closes(), vec![3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_empty_source_is_a_failure() {
        let source = FixedSource { closes: vec![] };
        let btc = Instrument::crypto("BTCUSDT").unwrap();
        assert_eq!(
            source.fetch(&btc, TradeMode::Spot, 50).await,
            Err(FetchError::Empty)
        );
    }
}
