//! Pipeline output and observers.

use chrono::{DateTime, Utc};
use signal_core::error::InferenceError;
use signal_core::types::{Instrument, SignalResponse, TradeMode};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::LoopState;

/// Result of one completed iteration.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub id: Uuid,
    pub iteration: u64,
    pub instrument: Instrument,
    pub mode: TradeMode,
    pub produced_at: DateTime<Utc>,
    pub outcome: Result<SignalResponse, InferenceError>,
}

impl PipelineOutput {
    pub fn new(
        iteration: u64,
        instrument: Instrument,
        mode: TradeMode,
        outcome: Result<SignalResponse, InferenceError>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            iteration,
            instrument,
            mode,
            produced_at: Utc::now(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Receives loop events.
///
/// Callbacks run on the loop's task, so they should return quickly.
pub trait PipelineObserver: Send + Sync {
    /// Called on every state change.
    fn on_transition(&self, _from: LoopState, _to: LoopState, _iteration: u64) {}

    /// Called once per completed iteration.
    fn on_output(&self, _output: &PipelineOutput) {}
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_transition(&self, from: LoopState, to: LoopState, iteration: u64) {
        tracing::debug!(from = %from, state = %to, iteration, "Loop transition");
    }

    fn on_output(&self, output: &PipelineOutput) {
        match &output.outcome {
            Ok(response) => match &response.recommendation {
                Ok(rec) => info!(
                    symbol = output.instrument.id(),
                    mode = %output.mode,
                    iteration = output.iteration,
                    signal = %rec.signal,
                    "Signal received"
                ),
                Err(err) => warn!(
                    symbol = output.instrument.id(),
                    iteration = output.iteration,
                    error = %err,
                    "Signal received but not parseable"
                ),
            },
            Err(err) => warn!(
                symbol = output.instrument.id(),
                iteration = output.iteration,
                error = %err,
                "Signal request failed"
            ),
        }
    }
}
