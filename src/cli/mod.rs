//! CLI definitions.

pub mod commands;
pub mod context;

use clap::{Parser, Subcommand, ValueEnum};
use signal_core::types::{TradeMode, Venue};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "market-signal")]
#[command(author, version, about = "Technical-indicator trading signals for crypto and forex")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the signal loop in the configured run mode (polling.run_mode)
    Run(RunArgs),
    /// Fetch a signal every poll interval until Ctrl-C
    Watch(RunArgs),
    /// Fetch a signal, then ask before fetching another
    Signal(RunArgs),
    /// Fetch market data once and print the indicator snapshot
    Analyze(AnalyzeArgs),
    /// List the top BingX gainers
    Gainers(GainersArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Spot,
    Futures,
    Forex,
}

impl From<ModeArg> for TradeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Spot => TradeMode::Spot,
            ModeArg::Futures => TradeMode::Futures,
            ModeArg::Forex => TradeMode::Forex,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VenueArg {
    Binance,
    Bingx,
}

impl From<VenueArg> for Venue {
    fn from(venue: VenueArg) -> Self {
        match venue {
            VenueArg::Binance => Venue::Binance,
            VenueArg::Bingx => Venue::Bingx,
        }
    }
}

/// Instrument selection shared by every market command.
#[derive(clap::Args)]
pub struct InstrumentArgs {
    /// Instrument, e.g. BTCUSDT, ETH-USDT or USDJPY
    #[arg(short, long)]
    pub symbol: String,

    /// Market; inferred from the symbol when omitted
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Crypto venue (overrides market.venue)
    #[arg(long)]
    pub venue: Option<VenueArg>,
}

#[derive(clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub instrument: InstrumentArgs,

    /// Stop after this many signals
    #[arg(long)]
    pub max_iterations: Option<u64>,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub instrument: InstrumentArgs,

    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct GainersArgs {
    /// Number of gainers to list (defaults to bingx.top_gainers)
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,
}
