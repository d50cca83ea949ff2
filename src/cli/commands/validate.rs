//! Validate configuration command.

use anyhow::Result;
use signal_config::{load_config, resolve_secret};
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("{}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Log level: {} ({})", config.logging.level, config.logging.format);
    println!("Venue: {:?}, interval {}, {} bars", config.market.venue, config.market.interval.as_str(), config.market.limit);
    println!("Model: {} (temperature {})", config.inference.model, config.inference.temperature);
    println!(
        "Polling: every {}s, retry after {}s, run mode {:?}",
        config.polling.poll_interval_secs, config.polling.retry_delay_secs, config.polling.run_mode
    );
    println!("Forex pairs: {}", config.forex.symbols.join(", "));

    for env_name in [&config.inference.api_key_env, &config.forex.api_key_env] {
        let status = if resolve_secret(env_name).is_ok() { "set" } else { "missing" };
        println!("{}: {}", env_name, status);
    }

    Ok(())
}
