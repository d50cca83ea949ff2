//! `run`, `watch` and `signal` commands.

use anyhow::{Context, Result};
use signal_config::AppConfig;
use signal_engine::{PollingLoop, RunMode, TracingObserver};
use signal_monitor::ConsoleObserver;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::context::{build_client, build_router, loop_config, resolve_instrument};
use crate::cli::RunArgs;

/// Run the signal loop. `run_mode` overrides `polling.run_mode` when given.
pub async fn run(args: RunArgs, config: &AppConfig, run_mode: Option<RunMode>) -> Result<()> {
    let (instrument, mode) = resolve_instrument(config, &args.instrument)?;
    let router = build_router(config, &instrument, args.instrument.venue.map(Into::into))?;
    let client = build_client(config)?;
    let loop_config = loop_config(config, instrument, mode, run_mode, args.max_iterations)?;

    info!(
        symbol = loop_config.instrument.id(),
        mode = %mode,
        model = client.model(),
        poll_interval_secs = loop_config.poll_interval.as_secs(),
        "Starting {} loop",
        match loop_config.run_mode {
            RunMode::Continuous => "watch",
            RunMode::Confirm => "signal",
        }
    );

    let handle = PollingLoop::new(loop_config, Arc::new(router), Arc::new(client))
        .with_observer(Arc::new(TracingObserver))
        .with_observer(Arc::new(ConsoleObserver))
        .spawn();

    let trigger = handle.trigger();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                trigger.trigger();
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    let stats = handle.join().await.context("signal loop did not shut down cleanly")?;

    println!();
    println!("Iterations: {}", stats.iterations);
    println!("Signals:    {} of {} requests answered", stats.signals, stats.outputs);
    println!("Failures:   {}", stats.total_failures);
    Ok(())
}
