//! Forex quotes from an exchange-rate API.
//!
//! The provider only publishes the latest conversion rates, so every fetch
//! yields a single synthetic bar stamped with the fetch time.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use signal_core::error::FetchError;
use signal_core::traits::MarketDataSource;
use signal_core::types::{AssetClass, Bar, Instrument, Series, Timeframe, TradeMode};
use tracing::debug;

use crate::http::{build_client, get_json};
use crate::kline::number;

/// Exchange-rate API configuration.
#[derive(Clone)]
pub struct ForexConfig {
    /// Base URL, e.g. `https://v6.exchangerate-api.com/v6`
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ForexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForexConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Latest-rate source for six-letter currency pairs.
pub struct ForexSource {
    config: ForexConfig,
    client: Client,
}

impl ForexSource {
    pub fn new(config: ForexConfig) -> Result<Self, FetchError> {
        if config.api_key.trim().is_empty() {
            return Err(FetchError::Configuration("forex API key is empty".to_string()));
        }
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    fn latest_url(&self, base: &str) -> String {
        format!(
            "{}/{}/latest/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
            base
        )
    }
}

/// Pick the `quote` rate out of a `conversion_rates` response.
pub fn parse_rate(body: &Value, quote: &str) -> Result<f64, FetchError> {
    let rates = match body.get("conversion_rates") {
        Some(Value::Object(rates)) => rates,
        Some(_) => return Err(FetchError::Schema("'conversion_rates' is not an object".to_string())),
        None => {
            let detail = body
                .get("error-type")
                .and_then(Value::as_str)
                .map(|e| format!("missing 'conversion_rates' ({})", e))
                .unwrap_or_else(|| "missing 'conversion_rates'".to_string());
            return Err(FetchError::Schema(detail));
        }
    };

    let rate = rates
        .get(quote)
        .ok_or_else(|| FetchError::MissingRate(quote.to_string()))?;

    number(rate).ok_or_else(|| FetchError::Schema(format!("{} rate is not numeric", quote)))
}

#[async_trait]
impl MarketDataSource for ForexSource {
    async fn fetch(
        &self,
        instrument: &Instrument,
        mode: TradeMode,
        _limit: usize,
    ) -> Result<Series, FetchError> {
        if instrument.asset_class() != AssetClass::Forex || mode != TradeMode::Forex {
            return Err(FetchError::UnsupportedMode {
                symbol: instrument.id().to_string(),
                mode: mode.as_str().to_string(),
            });
        }

        debug!(
            base = instrument.base(),
            quote = instrument.quote(),
            "Fetching latest forex rate"
        );

        let request = self.client.get(self.latest_url(instrument.base()));
        let body = get_json(request, self.config.timeout_secs).await?;
        let rate = parse_rate(&body, instrument.quote())?;

        let bar = Bar::close_only(Utc::now().timestamp_millis(), rate);
        Ok(Series::from_bars(instrument.id(), Timeframe::default(), vec![bar], 1))
    }

    fn name(&self) -> &str {
        "forex"
    }
}
