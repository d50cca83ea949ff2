//! Configuration structures.

use serde::{Deserialize, Serialize};
use signal_core::types::{Instrument, Timeframe, Venue};
use signal_engine::RunMode;
use std::time::Duration;

use crate::SettingsError;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub binance: BinanceSettings,
    #[serde(default)]
    pub bingx: BingxSettings,
    #[serde(default)]
    pub forex: ForexSettings,
    #[serde(default)]
    pub inference: InferenceSettings,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub polling: PollingSettings,
}

impl AppConfig {
    /// Check ranges and formats that deserialization alone cannot.
    ///
    /// Every problem found is reported, not just the first.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut problems = Vec::new();

        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            problems.push(format!("logging.level '{}' is not a log level", self.logging.level));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            problems.push(format!("logging.format must be 'pretty' or 'json', got '{}'", self.logging.format));
        }

        for (key, url) in [
            ("binance.spot_base_url", &self.binance.spot_base_url),
            ("binance.futures_base_url", &self.binance.futures_base_url),
            ("bingx.klines_url", &self.bingx.klines_url),
            ("bingx.tickers_url", &self.bingx.tickers_url),
            ("forex.base_url", &self.forex.base_url),
            ("inference.base_url", &self.inference.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push(format!("{} must be an http(s) URL, got '{}'", key, url));
            }
        }

        for symbol in &self.forex.symbols {
            if Instrument::forex(symbol).is_err() {
                problems.push(format!("forex.symbols entry '{}' is not a six-letter pair", symbol));
            }
        }
        if self.forex.api_key_env.trim().is_empty() {
            problems.push("forex.api_key_env is empty".to_string());
        }

        if self.inference.api_key_env.trim().is_empty() {
            problems.push("inference.api_key_env is empty".to_string());
        }
        if self.inference.model.trim().is_empty() {
            problems.push("inference.model is empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.inference.temperature) {
            problems.push(format!(
                "inference.temperature must be within [0, 2], got {}",
                self.inference.temperature
            ));
        }

        if !(1..=1500).contains(&self.market.limit) {
            problems.push(format!("market.limit must be within 1..=1500, got {}", self.market.limit));
        }

        for (key, secs) in [
            ("inference.timeout_secs", self.inference.timeout_secs),
            ("market.request_timeout_secs", self.market.request_timeout_secs),
            ("polling.poll_interval_secs", self.polling.poll_interval_secs),
            ("polling.retry_delay_secs", self.polling.retry_delay_secs),
            ("polling.fetch_timeout_secs", self.polling.fetch_timeout_secs),
            ("polling.inference_timeout_secs", self.polling.inference_timeout_secs),
        ] {
            if secs == 0 {
                problems.push(format!("{} must be greater than 0", key));
            }
        }
        if self.polling.max_iterations == Some(0) {
            problems.push("polling.max_iterations must be greater than 0 when set".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Invalid(problems.join("; ")))
        }
    }

    /// Whether `symbol` is one of the configured forex pairs.
    pub fn is_forex_symbol(&self, symbol: &str) -> bool {
        let normalized: String = symbol
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        self.forex
            .symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&normalized))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "market-signal".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily-rolling log files
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Binance endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BinanceSettings {
    pub spot_base_url: String,
    pub futures_base_url: String,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            spot_base_url: "https://api.binance.com".to_string(),
            futures_base_url: "https://fapi.binance.com".to_string(),
        }
    }
}

/// BingX endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BingxSettings {
    pub klines_url: String,
    pub tickers_url: String,
    /// Number of gainers listed by default
    pub top_gainers: usize,
}

impl Default for BingxSettings {
    fn default() -> Self {
        Self {
            klines_url: "https://api.bingx.com/api/v1/market".to_string(),
            tickers_url: "https://api.bingx.com/api/v1/market/tickers".to_string(),
            top_gainers: 5,
        }
    }
}

/// Exchange-rate API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForexSettings {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Pairs treated as forex when no mode is given
    pub symbols: Vec<String>,
}

impl Default for ForexSettings {
    fn default() -> Self {
        Self {
            base_url: "https://v6.exchangerate-api.com/v6".to_string(),
            api_key_env: "FOREX_API_KEY".to_string(),
            symbols: ["USDJPY", "EURUSD", "GBPUSD", "AUDUSD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Inference service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            model: "google/gemma-3-1b-it:free".to_string(),
            temperature: 0.5,
            timeout_secs: 30,
        }
    }
}

/// Market data settings shared by the crypto venues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    pub interval: Timeframe,
    /// Bars per fetch
    pub limit: usize,
    pub venue: Venue,
    pub request_timeout_secs: u64,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            interval: Timeframe::Hour1,
            limit: 50,
            venue: Venue::Binance,
            request_timeout_secs: 10,
        }
    }
}

/// Loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub poll_interval_secs: u64,
    pub retry_delay_secs: u64,
    pub fetch_timeout_secs: u64,
    pub inference_timeout_secs: u64,
    pub run_mode: RunMode,
    pub max_iterations: Option<u64>,
}

impl PollingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            retry_delay_secs: 10,
            fetch_timeout_secs: 15,
            inference_timeout_secs: 60,
            run_mode: RunMode::Continuous,
            max_iterations: None,
        }
    }
}
