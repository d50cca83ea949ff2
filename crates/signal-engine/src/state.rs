//! Loop states, run modes and loop configuration.

use serde::{Deserialize, Serialize};
use signal_core::error::InstrumentError;
use signal_core::types::{Instrument, Series, TradeMode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// States of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    Idle,
    Fetching,
    Analyzing,
    Requesting,
    Waiting,
    Retrying,
    Stopped,
}

impl LoopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopState::Idle => "idle",
            LoopState::Fetching => "fetching",
            LoopState::Analyzing => "analyzing",
            LoopState::Requesting => "requesting",
            LoopState::Waiting => "waiting",
            LoopState::Retrying => "retrying",
            LoopState::Stopped => "stopped",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Stopped)
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens after a signal has been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Sleep for the poll interval, then fetch again
    #[default]
    Continuous,
    /// Ask before every further iteration
    Confirm,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continuous" => Ok(RunMode::Continuous),
            "confirm" => Ok(RunMode::Confirm),
            other => Err(format!("unknown run mode '{}'", other)),
        }
    }
}

/// Per-run loop settings.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub instrument: Instrument,
    pub mode: TradeMode,
    /// Bars requested per fetch
    pub limit: usize,
    pub run_mode: RunMode,
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    /// Upper bound on a single fetch
    pub fetch_timeout: Duration,
    /// Upper bound on a single inference request
    pub inference_timeout: Duration,
    /// Stop after this many produced signals
    pub max_iterations: Option<u64>,
}

impl LoopConfig {
    /// Defaults: 50 bars, continuous, 60 s poll interval, 10 s retry delay.
    ///
    /// Fails if the instrument cannot be traded in `mode`.
    pub fn new(instrument: Instrument, mode: TradeMode) -> Result<Self, InstrumentError> {
        instrument.check_mode(mode)?;
        Ok(Self {
            instrument,
            mode,
            limit: Series::DEFAULT_LIMIT,
            run_mode: RunMode::Continuous,
            poll_interval: Duration::from_secs(60),
            retry_delay: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(15),
            inference_timeout: Duration::from_secs(60),
            max_iterations: None,
        })
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }
}

/// Counters kept by a loop instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    /// Iterations started (each begins with a fetch)
    pub iterations: u64,
    /// Outputs handed to observers
    pub outputs: u64,
    /// Outputs whose inference request succeeded
    pub signals: u64,
    /// Failures since the last successful request
    pub consecutive_failures: u32,
    /// Iterations that ended in `Retrying`
    pub total_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_config_rejects_bad_mode() {
        let usdjpy = Instrument::forex("USDJPY").unwrap();
        assert!(LoopConfig::new(usdjpy.clone(), TradeMode::Spot).is_err());

        let config = LoopConfig::new(usdjpy, TradeMode::Forex).unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.retry_delay, Duration::from_secs(10));
        assert_eq!(config.run_mode, RunMode::Continuous);
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!("Confirm".parse::<RunMode>(), Ok(RunMode::Confirm));
        assert!("sometimes".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(LoopState::Retrying.to_string(), "retrying");
        assert!(LoopState::Stopped.is_terminal());
        assert!(!LoopState::Waiting.is_terminal());
    }
}
