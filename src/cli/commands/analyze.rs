//! `analyze` command: one fetch, no inference.

use anyhow::{bail, Result};
use signal_config::AppConfig;
use signal_core::traits::MarketDataSource;
use signal_indicators::IndicatorEngine;
use signal_monitor::render_snapshot;

use crate::cli::context::{build_router, resolve_instrument};
use crate::cli::AnalyzeArgs;

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let (instrument, mode) = resolve_instrument(config, &args.instrument)?;
    let router = build_router(config, &instrument, args.instrument.venue.map(Into::into))?;

    let series = router.fetch(&instrument, mode, config.market.limit).await?;
    let Some(snapshot) = IndicatorEngine::new().analyze(&series) else {
        bail!("{} returned no bars for {}", router.name(), instrument);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_snapshot(&instrument, mode, &snapshot));
        println!("  ({} bars, {} of 6 indicators available)", series.len(), snapshot.available_count());
    }
    Ok(())
}
