//! Source selection by asset class and venue.

use async_trait::async_trait;
use signal_core::error::FetchError;
use signal_core::traits::MarketDataSource;
use signal_core::types::{AssetClass, Instrument, Series, TradeMode};
use std::sync::Arc;
use tracing::debug;

/// Dispatches each fetch to the source that serves the instrument.
///
/// Crypto goes to the configured venue; forex goes to the forex source,
/// which is optional because it needs an API key.
pub struct MarketRouter {
    crypto: Arc<dyn MarketDataSource>,
    forex: Option<Arc<dyn MarketDataSource>>,
}

impl MarketRouter {
    pub fn new(crypto: Arc<dyn MarketDataSource>) -> Self {
        Self { crypto, forex: None }
    }

    /// Attach a forex source.
    pub fn with_forex(mut self, forex: Arc<dyn MarketDataSource>) -> Self {
        self.forex = Some(forex);
        self
    }

    fn route(&self, instrument: &Instrument) -> Result<&Arc<dyn MarketDataSource>, FetchError> {
        match instrument.asset_class() {
            AssetClass::Crypto => Ok(&self.crypto),
            AssetClass::Forex => self.forex.as_ref().ok_or_else(|| {
                FetchError::Configuration("no forex source configured (API key missing?)".to_string())
            }),
        }
    }
}

#[async_trait]
impl MarketDataSource for MarketRouter {
    async fn fetch(
        &self,
        instrument: &Instrument,
        mode: TradeMode,
        limit: usize,
    ) -> Result<Series, FetchError> {
        if !instrument.supports(mode) {
            return Err(FetchError::UnsupportedMode {
                symbol: instrument.id().to_string(),
                mode: mode.as_str().to_string(),
            });
        }

        let source = self.route(instrument)?;
        debug!(symbol = instrument.id(), source = source.name(), "Routing fetch");

        let series = source.fetch(instrument, mode, limit).await?;
        if series.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(series)
    }

    fn name(&self) -> &str {
        "router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::types::{Bar, Timeframe};

    struct Named(&'static str, usize);

    #[async_trait]
    impl MarketDataSource for Named {
        async fn fetch(
            &self,
            instrument: &Instrument,
            _mode: TradeMode,
            _limit: usize,
        ) -> Result<Series, FetchError> {
            let bars = (0..self.1).map(|i| Bar::close_only(i as i64, 1.0)).collect();
            Ok(Series::from_bars(
                format!("{}:{}", self.0, instrument.id()),
                Timeframe::Hour1,
                bars,
                usize::MAX,
            ))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[tokio::test]
    async fn test_routes_by_asset_class() {
        let router = MarketRouter::new(Arc::new(Named("crypto", 3)))
            .with_forex(Arc::new(Named("fx", 1)));

        let btc = Instrument::crypto("BTCUSDT").unwrap();
        let jpy = Instrument::forex("USDJPY").unwrap();

        assert_eq!(router.fetch(&btc, TradeMode::Futures, 50).await.unwrap().symbol, "crypto:BTCUSDT");
        assert_eq!(router.fetch(&jpy, TradeMode::Forex, 50).await.unwrap().symbol, "fx:USDJPY");
    }

    #[tokio::test]
    async fn test_mode_mismatch() {
        let router = MarketRouter::new(Arc::new(Named("crypto", 3)));
        let btc = Instrument::crypto("BTCUSDT").unwrap();

        assert!(matches!(
            router.fetch(&btc, TradeMode::Forex, 50).await,
            Err(FetchError::UnsupportedMode { .. })
        ));
    }

    #[tokio::test]
    async fn test_forex_without_source() {
        let router = MarketRouter::new(Arc::new(Named("crypto", 3)));
        let jpy = Instrument::forex("USDJPY").unwrap();

        assert!(matches!(
            router.fetch(&jpy, TradeMode::Forex, 50).await,
            Err(FetchError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_series_is_error() {
        let router = MarketRouter::new(Arc::new(Named("crypto", 0)));
        let btc = Instrument::crypto("BTCUSDT").unwrap();

        assert_eq!(router.fetch(&btc, TradeMode::Spot, 50).await, Err(FetchError::Empty));
    }
}
