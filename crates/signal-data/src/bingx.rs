//! BingX klines and top-gainers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use signal_core::error::FetchError;
use signal_core::traits::MarketDataSource;
use signal_core::types::{AssetClass, Instrument, Series, Timeframe, TradeMode, Venue};
use tracing::{debug, warn};

use crate::http::{build_client, get_json, provider_error};
use crate::kline::{number, parse_rows};

/// BingX endpoint configuration.
#[derive(Debug, Clone)]
pub struct BingxConfig {
    /// Full klines URL
    pub klines_url: String,
    /// Full tickers URL used for the gainers list
    pub tickers_url: String,
    pub interval: Timeframe,
    pub timeout_secs: u64,
}

impl Default for BingxConfig {
    fn default() -> Self {
        Self {
            klines_url: "https://api.bingx.com/api/v1/market".to_string(),
            tickers_url: "https://api.bingx.com/api/v1/market/tickers".to_string(),
            interval: Timeframe::Hour1,
            timeout_secs: 10,
        }
    }
}

/// One entry of the top-gainers list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gainer {
    /// Venue symbol, e.g. `PEPE-USDT`
    pub symbol: String,
    /// 24h change as reported by the venue
    pub change_rate: f64,
}

/// BingX market data client.
pub struct BingxSource {
    config: BingxConfig,
    client: Client,
}

impl BingxSource {
    pub fn new(config: BingxConfig) -> Result<Self, FetchError> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// The `top` tickers with the highest change rate, best first.
    pub async fn top_gainers(&self, top: usize) -> Result<Vec<Gainer>, FetchError> {
        debug!(url = %self.config.tickers_url, top, "Fetching BingX tickers");
        let request = self.client.get(&self.config.tickers_url);
        let body = get_json(request, self.config.timeout_secs).await?;
        parse_gainers(&body, top)
    }
}

/// Rows under `data`, or the error the venue reported instead.
fn data_array(body: &Value) -> Result<&Vec<Value>, FetchError> {
    match body.get("data") {
        Some(Value::Array(rows)) => Ok(rows),
        Some(_) => Err(FetchError::Schema("'data' is not an array".to_string())),
        None => Err(provider_error(body)
            .unwrap_or_else(|| FetchError::Schema("missing 'data' field".to_string()))),
    }
}

/// Decode a klines response: `{"code": 0, "data": [[t, o, h, l, c, v], ...]}`.
pub fn parse_klines(
    body: &Value,
    symbol: &str,
    interval: Timeframe,
    limit: usize,
) -> Result<Series, FetchError> {
    let bars = parse_rows(data_array(body)?)?;
    Ok(Series::from_bars(symbol, interval, bars, limit))
}

/// Decode a tickers response and keep the `top` biggest gainers.
///
/// Tickers without a usable `symbol` or `changeRate` are skipped.
pub fn parse_gainers(body: &Value, top: usize) -> Result<Vec<Gainer>, FetchError> {
    let rows = data_array(body)?;

    let mut gainers: Vec<Gainer> = rows
        .iter()
        .filter_map(|row| {
            let symbol = row.get("symbol")?.as_str()?.to_string();
            let change_rate = match row.get("changeRate")? {
                Value::String(s) => number(&Value::String(s.trim_end_matches('%').to_string())),
                other => number(other),
            };
            match change_rate {
                Some(change_rate) => Some(Gainer { symbol, change_rate }),
                None => {
                    warn!(symbol = %symbol, "Skipping ticker with unparseable changeRate");
                    None
                }
            }
        })
        .collect();

    gainers.sort_by(|a, b| b.change_rate.total_cmp(&a.change_rate));
    gainers.truncate(top);
    Ok(gainers)
}

#[async_trait]
impl MarketDataSource for BingxSource {
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

        let symbol = instrument.venue_symbol(Venue::Bingx);
        debug!(symbol = %symbol, mode = %mode, "Fetching BingX klines");

        let request = self.client.get(&self.config.klines_url).query(&[
            ("symbol", symbol.clone()),
            ("interval", self.config.interval.as_str().to_string()),
            ("limit", limit.to_string()),
            ("type", mode.as_str().to_string()),
        ]);
        let body = get_json(request, self.config.timeout_secs).await?;

        parse_klines(&body, &symbol, self.config.interval, limit)
    }

    fn name(&self) -> &str {
        "bingx"
    }
}
