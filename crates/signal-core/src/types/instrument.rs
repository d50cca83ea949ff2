//! Instruments, asset classes, trade modes and venue symbol mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InstrumentError;

/// Quote assets recognised when splitting an undelimited crypto symbol.
/// Longer suffixes come first so `FDUSD` wins over `USD`-like matches.
const CRYPTO_QUOTES: &[&str] = &["FDUSD", "USDT", "USDC", "BUSD", "TUSD", "BTC", "ETH", "BNB", "EUR", "TRY"];

/// ISO 4217 codes recognised when inferring forex pairs.
const FIAT_CODES: &[&str] = &[
    "USD", "EUR", "JPY", "GBP", "AUD", "CAD", "CHF", "NZD", "CNY", "HKD", "SGD", "SEK", "NOK", "DKK",
    "PLN", "CZK", "HUF", "TRY", "ZAR", "MXN", "BRL", "INR", "KRW", "RUB", "THB", "IDR", "AED", "SAR",
];

/// Broad asset class of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Forex,
}

/// Market the signal is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeMode {
    #[default]
    Spot,
    Futures,
    Forex,
}

impl TradeMode {
    /// Label used in prompts and console output.
    pub fn label(&self) -> &'static str {
        match self {
            TradeMode::Spot => "Spot",
            TradeMode::Futures => "Futures",
            TradeMode::Forex => "Forex",
        }
    }

    /// Lowercase spelling used in query strings and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeMode::Spot => "spot",
            TradeMode::Futures => "futures",
            TradeMode::Forex => "forex",
        }
    }
}

impl fmt::Display for TradeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TradeMode {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spot" | "1" => Ok(TradeMode::Spot),
            "futures" | "future" | "perp" | "2" => Ok(TradeMode::Futures),
            "forex" | "fx" => Ok(TradeMode::Forex),
            other => Err(InstrumentError::UnknownMode(other.to_string())),
        }
    }
}

/// Crypto venue whose symbol spelling an instrument is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    #[default]
    Binance,
    Bingx,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Binance => f.write_str("binance"),
            Venue::Bingx => f.write_str("bingx"),
        }
    }
}

/// A tradable instrument, fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    id: String,
    asset_class: AssetClass,
    base: String,
    quote: String,
}

impl Instrument {
    /// Create a crypto instrument from `BTCUSDT`, `BTC-USDT` or `BTC/USDT`.
    pub fn crypto(symbol: &str) -> Result<Self, InstrumentError> {
        let raw = symbol.trim().to_uppercase();
        if raw.is_empty() {
            return Err(InstrumentError::Empty);
        }

        let (base, quote) = if let Some((b, q)) = raw.split_once(['-', '/', '_']) {
            (b.to_string(), q.to_string())
        } else {
            let quote = CRYPTO_QUOTES
                .iter()
                .find(|q| raw.len() > q.len() && raw.ends_with(*q))
                .ok_or_else(|| InstrumentError::InvalidCryptoSymbol(symbol.to_string()))?;
            (raw[..raw.len() - quote.len()].to_string(), quote.to_string())
        };

        let valid = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(&base) || !valid(&quote) {
            return Err(InstrumentError::InvalidCryptoSymbol(symbol.to_string()));
        }

        Ok(Self {
            id: format!("{}{}", base, quote),
            asset_class: AssetClass::Crypto,
            base,
            quote,
        })
    }

    /// Create a forex instrument from a six-letter pair such as `USDJPY`.
    ///
    /// The pair is split at position 3 into base and quote currency.
    pub fn forex(pair: &str) -> Result<Self, InstrumentError> {
        let raw: String = pair
            .trim()
            .chars()
            .filter(|c| *c != '/' && *c != '-')
            .collect::<String>()
            .to_uppercase();
        if raw.is_empty() {
            return Err(InstrumentError::Empty);
        }
        if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InstrumentError::InvalidForexPair(pair.to_string()));
        }

        let (base, quote) = raw.split_at(3);
        Ok(Self {
            id: raw.clone(),
            asset_class: AssetClass::Forex,
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }

    /// Infer the asset class from the symbol shape.
    ///
    /// Six-letter pairs of two fiat currencies are forex even when the
    /// quote is also a crypto quote asset (`USDTRY`, `GBPEUR`). Otherwise
    /// symbols ending in a known crypto quote asset are crypto and any
    /// other six-letter pair is forex.
    pub fn parse(symbol: &str) -> Result<Self, InstrumentError> {
        if let Ok(pair) = Self::forex(symbol) {
            if is_fiat(pair.base()) && is_fiat(pair.quote()) {
                return Ok(pair);
            }
        }
        match Self::crypto(symbol) {
            Ok(instrument) => Ok(instrument),
            Err(crypto_err) => Self::forex(symbol).map_err(|_| crypto_err),
        }
    }

    /// Normalised identifier, e.g. `BTCUSDT` or `USDJPY`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    /// Base asset or currency (`BTC`, `USD`).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote asset or currency (`USDT`, `JPY`).
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Symbol spelling expected by a crypto venue.
    pub fn venue_symbol(&self, venue: Venue) -> String {
        match venue {
            Venue::Binance => self.id.clone(),
            Venue::Bingx => format!("{}-{}", self.base, self.quote),
        }
    }

    /// The mode used when none is given explicitly.
    pub fn default_mode(&self) -> TradeMode {
        match self.asset_class {
            AssetClass::Crypto => TradeMode::Spot,
            AssetClass::Forex => TradeMode::Forex,
        }
    }

    /// Whether this instrument can be traded in the given mode.
    pub fn supports(&self, mode: TradeMode) -> bool {
        matches!(
            (self.asset_class, mode),
            (AssetClass::Crypto, TradeMode::Spot)
                | (AssetClass::Crypto, TradeMode::Futures)
                | (AssetClass::Forex, TradeMode::Forex)
        )
    }

    /// Reject mode combinations the data sources cannot serve.
    pub fn check_mode(&self, mode: TradeMode) -> Result<(), InstrumentError> {
        if self.supports(mode) {
            Ok(())
        } else {
            Err(InstrumentError::UnsupportedMode {
                symbol: self.id.clone(),
                mode: mode.as_str().to_string(),
            })
        }
    }
}

fn is_fiat(code: &str) -> bool {
    FIAT_CODES.contains(&code)
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
