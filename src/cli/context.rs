//! Wiring of config into sources, clients and loop settings.

use anyhow::{Context, Result};
use signal_config::{resolve_secret, AppConfig};
use signal_core::types::{AssetClass, Instrument, TradeMode, Venue};
use signal_data::{BinanceConfig, BinanceSource, BingxConfig, BingxSource, ForexConfig, ForexSource, MarketRouter};
use signal_engine::{LoopConfig, RunMode};
use signal_inference::{InferenceConfig, OpenRouterClient};
use std::sync::Arc;
use tracing::debug;

use crate::cli::InstrumentArgs;

/// Resolve the instrument and trade mode from the command line.
///
/// Without `--mode`, configured forex pairs and other six-letter fiat
/// pairs are forex; everything else is spot crypto.
pub fn resolve_instrument(config: &AppConfig, args: &InstrumentArgs) -> Result<(Instrument, TradeMode)> {
    let symbol = args.symbol.as_str();
    let (instrument, mode) = match args.mode.map(TradeMode::from) {
        Some(TradeMode::Forex) => (Instrument::forex(symbol)?, TradeMode::Forex),
        Some(mode) => (Instrument::crypto(symbol)?, mode),
        None if config.is_forex_symbol(symbol) => (Instrument::forex(symbol)?, TradeMode::Forex),
        None => {
            let instrument = Instrument::parse(symbol)?;
            let mode = instrument.default_mode();
            (instrument, mode)
        }
    };

    instrument.check_mode(mode)?;
    debug!(symbol = instrument.id(), mode = %mode, "Resolved instrument");
    Ok((instrument, mode))
}

pub fn bingx_config(config: &AppConfig) -> BingxConfig {
    BingxConfig {
        klines_url: config.bingx.klines_url.clone(),
        tickers_url: config.bingx.tickers_url.clone(),
        interval: config.market.interval,
        timeout_secs: config.market.request_timeout_secs,
    }
}

/// Build the market router for an instrument.
///
/// The forex source is only attached when the instrument needs it, so a
/// missing forex key does not block crypto runs.
pub fn build_router(
    config: &AppConfig,
    instrument: &Instrument,
    venue: Option<Venue>,
) -> Result<MarketRouter> {
    let venue = venue.unwrap_or(config.market.venue);
    let crypto: Arc<dyn signal_core::traits::MarketDataSource> = match venue {
        Venue::Binance => Arc::new(BinanceSource::new(BinanceConfig {
            spot_base_url: config.binance.spot_base_url.clone(),
            futures_base_url: config.binance.futures_base_url.clone(),
            interval: config.market.interval,
            timeout_secs: config.market.request_timeout_secs,
        })?),
        Venue::Bingx => Arc::new(BingxSource::new(bingx_config(config))?),
    };
    let mut router = MarketRouter::new(crypto);

    if instrument.asset_class() == AssetClass::Forex {
        let api_key = resolve_secret(&config.forex.api_key_env)
            .context("forex instruments need an exchange-rate API key")?;
        router = router.with_forex(Arc::new(ForexSource::new(ForexConfig {
            base_url: config.forex.base_url.clone(),
            api_key,
            timeout_secs: config.market.request_timeout_secs,
        })?));
    }

    Ok(router)
}

pub fn build_client(config: &AppConfig) -> Result<OpenRouterClient> {
    let api_key = resolve_secret(&config.inference.api_key_env)
        .context("the inference service needs an API key")?;

    let client = OpenRouterClient::new(InferenceConfig {
        base_url: config.inference.base_url.clone(),
        api_key,
        model: config.inference.model.clone(),
        temperature: config.inference.temperature,
        timeout_secs: config.inference.timeout_secs,
    })?;
    Ok(client)
}

/// Loop settings from config. An explicit `run_mode` wins over
/// `polling.run_mode`, and `max_iterations` over `polling.max_iterations`.
pub fn loop_config(
    config: &AppConfig,
    instrument: Instrument,
    mode: TradeMode,
    run_mode: Option<RunMode>,
    max_iterations: Option<u64>,
) -> Result<LoopConfig> {
    let polling = &config.polling;
    let run_mode = run_mode.unwrap_or(polling.run_mode);
    let mut loop_config = LoopConfig::new(instrument, mode)?.with_run_mode(run_mode);
    loop_config.limit = config.market.limit;
    loop_config.poll_interval = polling.poll_interval();
    loop_config.retry_delay = polling.retry_delay();
    loop_config.fetch_timeout = polling.fetch_timeout();
    loop_config.inference_timeout = polling.inference_timeout();
    loop_config.max_iterations = max_iterations.or(polling.max_iterations);
    Ok(loop_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModeArg;

    fn args(symbol: &str, mode: Option<ModeArg>) -> InstrumentArgs {
        InstrumentArgs {
            symbol: symbol.to_string(),
            mode,
            venue: None,
        }
    }

    #[test]
    fn test_mode_inference() {
        let config = AppConfig::default();

        let (btc, mode) = resolve_instrument(&config, &args("BTCUSDT", None)).unwrap();
        assert_eq!((btc.id(), mode), ("BTCUSDT", TradeMode::Spot));

        let (jpy, mode) = resolve_instrument(&config, &args("USDJPY", None)).unwrap();
        assert_eq!((jpy.base(), jpy.quote(), mode), ("USD", "JPY", TradeMode::Forex));

        let (_, mode) = resolve_instrument(&config, &args("ETH-USDT", Some(ModeArg::Futures))).unwrap();
        assert_eq!(mode, TradeMode::Futures);

        // Not in forex.symbols, but both legs are fiat.
        let (try_pair, mode) = resolve_instrument(&config, &args("USDTRY", None)).unwrap();
        assert_eq!((try_pair.asset_class(), mode), (AssetClass::Forex, TradeMode::Forex));
    }

    #[test]
    fn test_explicit_mode_mismatch() {
        let config = AppConfig::default();
        assert!(resolve_instrument(&config, &args("BTCUSDT", Some(ModeArg::Forex))).is_err());
        assert!(resolve_instrument(&config, &args("USDJPY", Some(ModeArg::Spot))).is_err());
    }

    #[test]
    fn test_loop_config_from_settings() {
        let mut config = AppConfig::default();
        config.polling.poll_interval_secs = 30;
        config.polling.max_iterations = Some(4);
        let btc = Instrument::crypto("BTCUSDT").unwrap();

        let lc = loop_config(&config, btc.clone(), TradeMode::Spot, Some(RunMode::Confirm), None).unwrap();
        assert_eq!(lc.poll_interval.as_secs(), 30);
        assert_eq!(lc.max_iterations, Some(4));
        assert_eq!(lc.run_mode, RunMode::Confirm);

        let lc = loop_config(&config, btc, TradeMode::Spot, Some(RunMode::Continuous), Some(1)).unwrap();
        assert_eq!(lc.max_iterations, Some(1));
    }

    #[test]
    fn test_run_mode_falls_back_to_config() {
        let mut config = AppConfig::default();
        let btc = Instrument::crypto("BTCUSDT").unwrap();

        let lc = loop_config(&config, btc.clone(), TradeMode::Spot, None, None).unwrap();
        assert_eq!(lc.run_mode, RunMode::Continuous);

        config.polling.run_mode = RunMode::Confirm;
        let lc = loop_config(&config, btc.clone(), TradeMode::Spot, None, None).unwrap();
        assert_eq!(lc.run_mode, RunMode::Confirm);

        let lc = loop_config(&config, btc, TradeMode::Spot, Some(RunMode::Continuous), None).unwrap();
        assert_eq!(lc.run_mode, RunMode::Continuous);
    }
}
