//! Binance spot and USDⓈ-M futures klines.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use signal_core::error::FetchError;
use signal_core::traits::MarketDataSource;
use signal_core::types::{AssetClass, Instrument, Series, Timeframe, TradeMode, Venue};
use tracing::debug;

use crate::http::{build_client, get_json, provider_error};
use crate::kline::parse_rows;

/// Binance endpoint configuration.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// Spot REST base, e.g. `https://api.binance.com`
    pub spot_base_url: String,
    /// Futures REST base, e.g. `https://fapi.binance.com`
    pub futures_base_url: String,
    pub interval: Timeframe,
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            spot_base_url: "https://api.binance.com".to_string(),
            futures_base_url: "https://fapi.binance.com".to_string(),
            interval: Timeframe::Hour1,
            timeout_secs: 10,
        }
    }
}

/// Kline source backed by the public Binance REST API.
pub struct BinanceSource {
    config: BinanceConfig,
    client: Client,
}

impl BinanceSource {
    pub fn new(config: BinanceConfig) -> Result<Self, FetchError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Klines URL for the given market.
    pub fn klines_url(&self, mode: TradeMode) -> String {
        match mode {
            TradeMode::Futures => format!(
                "{}/fapi/v1/klines",
                self.config.futures_base_url.trim_end_matches('/')
            ),
            _ => format!(
                "{}/api/v3/klines",
                self.config.spot_base_url.trim_end_matches('/')
            ),
        }
    }
}

/// Decode a klines response body.
///
/// Binance answers with an array of rows on success and with a
/// `{"code", "msg"}` object on failure.
pub fn parse_klines(
    body: &Value,
    symbol: &str,
    interval: Timeframe,
    limit: usize,
) -> Result<Series, FetchError> {
    match body {
        Value::Array(rows) => {
            let bars = parse_rows(rows)?;
            Ok(Series::from_bars(symbol, interval, bars, limit))
        }
        other => Err(provider_error(other).unwrap_or_else(|| {
            FetchError::Schema("expected an array of klines".to_string())
        })),
    }
}

#[async_trait]
impl MarketDataSource for BinanceSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        mode: TradeMode,
        limit: usize,
    ) -> Result<Series, FetchError> {
        if instrument.asset_class() != AssetClass::Crypto || mode == TradeMode::Forex {
            return Err(FetchError::UnsupportedMode {
                symbol: instrument.id().to_string(),
                mode: mode.as_str().to_string(),
            });
        }

        let symbol = instrument.venue_symbol(Venue::Binance);
        let url = self.klines_url(mode);
        debug!(symbol = %symbol, mode = %mode, url = %url, "Fetching Binance klines");

        let request = self.client.get(&url).query(&[
            ("symbol", symbol.clone()),
            ("interval", self.config.interval.as_str().to_string()),
            ("limit", limit.to_string()),
        ]);
        let body = get_json(request, self.config.timeout_secs).await?;

        parse_klines(&body, &symbol, self.config.interval, limit)
    }

    fn name(&self) -> &str {
        "binance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_klines_url_by_mode() {
        let source = BinanceSource::new(BinanceConfig {
            spot_base_url: "http://spot.test/".into(),
            futures_base_url: "http://fut.test".into(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(source.klines_url(TradeMode::Spot), "http://spot.test/api/v3/klines");
        assert_eq!(source.klines_url(TradeMode::Futures), "http://fut.test/fapi/v1/klines");
    }

    #[test]
    fn test_parse_klines_sorted_and_bounded() {
        let body = json!([
            [3000, "3", "3", "3", "3", "1"],
            [1000, "1", "1", "1", "1", "1"],
            [2000, "2", "2", "2", "2", "1"]
        ]);
        let series = parse_klines(&body, "BTCUSDT", Timeframe::Hour1, 2).unwrap();

        assert_eq!(series.symbol, "BTCUSDT");
        assert_eq!(series.closes(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_parse_klines_error_object() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert_eq!(
            parse_klines(&body, "NOPEUSDT", Timeframe::Hour1, 50),
            Err(FetchError::Provider {
                code: -1121,
                message: "Invalid symbol.".into()
            })
        );

        assert!(matches!(
            parse_klines(&json!({"weird": true}), "X", Timeframe::Hour1, 50),
            Err(FetchError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_klines_empty_array() {
        assert_eq!(
            parse_klines(&json!([]), "BTCUSDT", Timeframe::Hour1, 50),
            Err(FetchError::Empty)
        );
    }

    #[tokio::test]
    async fn test_forex_instrument_rejected_without_request() {
        let source = BinanceSource::new(BinanceConfig::default()).unwrap();
        let usdjpy = Instrument::forex("USDJPY").unwrap();

        assert!(matches!(
            source.fetch(&usdjpy, TradeMode::Forex, 50).await,
            Err(FetchError::UnsupportedMode { .. })
        ));
    }
}
