//! `gainers` command.

use anyhow::{Context, Result};
use signal_config::AppConfig;
use signal_data::BingxSource;

use crate::cli::context::bingx_config;
use crate::cli::GainersArgs;

pub async fn run(args: GainersArgs, config: &AppConfig) -> Result<()> {
    let top = args.top.unwrap_or(config.bingx.top_gainers);
    let source = BingxSource::new(bingx_config(config))?;
    let gainers = source
        .top_gainers(top)
        .await
        .context("failed to fetch BingX tickers")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&gainers)?);
        return Ok(());
    }

    if gainers.is_empty() {
        println!("No gainers reported.");
        return Ok(());
    }

    println!("Top {} BingX gainers (24h):", gainers.len());
    for (rank, gainer) in gainers.iter().enumerate() {
        println!("  {:>2}. {:<16}{:>+8.2}%", rank + 1, gainer.symbol, gainer.change_rate);
    }
    Ok(())
}
