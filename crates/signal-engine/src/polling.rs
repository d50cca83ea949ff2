//! The polling loop state machine.

use futures::FutureExt;
use signal_core::error::{InferenceError, PipelineError};
use signal_core::traits::{MarketDataSource, SignalClient};
use signal_core::types::SignalRequest;
use signal_indicators::IndicatorEngine;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::control::{shutdown_channel, ContinuePrompt, Shutdown, ShutdownTrigger, Sleeper, StdinPrompt, TokioSleeper};
use crate::output::{PipelineObserver, PipelineOutput};
use crate::state::{LoopConfig, LoopState, LoopStats, RunMode};

/// How the fetch/analyze/request stages of one iteration ended.
enum StageResult {
    Produced(PipelineOutput),
    Failed(String),
    Cancelled,
}

/// Fetch → analyze → request loop for one instrument.
///
/// Iterations are strictly sequential. Fetch and analysis failures lead to
/// `Retrying`; an inference failure still produces an output and leads to
/// `Waiting`. A panic inside any collaborator is caught and treated as a
/// failed iteration.
pub struct PollingLoop {
    config: LoopConfig,
    source: Arc<dyn MarketDataSource>,
    client: Arc<dyn SignalClient>,
    engine: IndicatorEngine,
    sleeper: Arc<dyn Sleeper>,
    prompt: Arc<dyn ContinuePrompt>,
    observers: Vec<Arc<dyn PipelineObserver>>,
    shutdown: Shutdown,
    state: LoopState,
    stats: LoopStats,
}

impl PollingLoop {
    /// Create a loop with real-time sleeping and a stdin continue prompt.
    pub fn new(
        config: LoopConfig,
        source: Arc<dyn MarketDataSource>,
        client: Arc<dyn SignalClient>,
    ) -> Self {
        Self {
            config,
            source,
            client,
            engine: IndicatorEngine::new(),
            sleeper: Arc::new(TokioSleeper),
            prompt: Arc::new(StdinPrompt::default()),
            observers: Vec::new(),
            shutdown: Shutdown::never(),
            state: LoopState::Idle,
            stats: LoopStats::default(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn ContinuePrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run until stopped by the prompt, the iteration limit or cancellation.
    pub async fn run(&mut self) -> LoopStats {
        info!(
            symbol = self.config.instrument.id(),
            mode = %self.config.mode,
            run_mode = ?self.config.run_mode,
            source = self.source.name(),
            client = self.client.name(),
            "Starting signal loop"
        );

        self.transition(LoopState::Fetching);

        while !self.state.is_terminal() {
            if self.shutdown.is_triggered() {
                info!("Shutdown requested");
                self.transition(LoopState::Stopped);
                break;
            }

            let state = self.state;
            let outcome = AssertUnwindSafe(self.step(state)).catch_unwind().await;
            let next = match outcome {
                Ok(next) => next,
                Err(panic) => self.recover(state, &*panic),
            };
            self.transition(next);
        }

        info!(
            symbol = self.config.instrument.id(),
            iterations = self.stats.iterations,
            outputs = self.stats.outputs,
            failures = self.stats.total_failures,
            "Signal loop stopped"
        );
        self.stats
    }

    /// Run on the tokio runtime.
    ///
    /// The returned handle owns the loop's cancellation trigger; any
    /// shutdown set with [`with_shutdown`](Self::with_shutdown) is replaced.
    pub fn spawn(mut self) -> LoopHandle {
        let (trigger, shutdown) = shutdown_channel();
        self.shutdown = shutdown;
        let join = tokio::spawn(async move { self.run().await });
        LoopHandle { trigger, join }
    }

    fn transition(&mut self, to: LoopState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(from = %from, state = %to, iteration = self.stats.iterations, "State change");
        let iteration = self.stats.iterations;
        self.notify(|observer| observer.on_transition(from, to, iteration));
    }

    /// Hand an event to every observer. A panicking observer is logged and
    /// skipped; it never takes the loop down.
    fn notify(&self, event: impl Fn(&dyn PipelineObserver)) {
        for observer in &self.observers {
            if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(|| event(observer.as_ref()))) {
                error!(
                    symbol = self.config.instrument.id(),
                    error = %panic_message(&*panic),
                    "Observer panicked"
                );
            }
        }
    }

    async fn step(&mut self, state: LoopState) -> LoopState {
        match state {
            LoopState::Fetching => self.iterate().await,
            LoopState::Waiting => self.wait().await,
            LoopState::Retrying => self.retry().await,
            // Only reachable if an iteration was interrupted mid-stage.
            LoopState::Idle | LoopState::Analyzing | LoopState::Requesting => LoopState::Fetching,
            LoopState::Stopped => LoopState::Stopped,
        }
    }

    /// Pick the next state after a panic outside the iteration stages, e.g.
    /// in the sleeper or the continue prompt.
    fn recover(&mut self, state: LoopState, panic: &(dyn Any + Send)) -> LoopState {
        self.stats.total_failures += 1;
        self.stats.consecutive_failures = self.stats.consecutive_failures.saturating_add(1);
        error!(
            symbol = self.config.instrument.id(),
            state = %state,
            error = %panic_message(panic),
            "Loop step panicked"
        );
        match state {
            // The delay is lost; the next fetch still runs.
            LoopState::Retrying => LoopState::Fetching,
            _ => LoopState::Retrying,
        }
    }

    async fn iterate(&mut self) -> LoopState {
        self.stats.iterations += 1;
        let iteration = self.stats.iterations;

        let result = AssertUnwindSafe(self.run_stages(iteration))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| StageResult::Failed(format!("panic: {}", panic_message(&*panic))));

        match result {
            StageResult::Produced(output) => {
                self.stats.outputs += 1;
                if output.is_success() {
                    self.stats.signals += 1;
                    self.stats.consecutive_failures = 0;
                }
                self.notify(|observer| observer.on_output(&output));
                LoopState::Waiting
            }
            StageResult::Failed(reason) => {
                self.stats.total_failures += 1;
                self.stats.consecutive_failures = self.stats.consecutive_failures.saturating_add(1);
                warn!(
                    symbol = self.config.instrument.id(),
                    iteration,
                    consecutive_failures = self.stats.consecutive_failures,
                    error = %reason,
                    "Iteration failed, retrying in {:?}",
                    self.config.retry_delay
                );
                LoopState::Retrying
            }
            StageResult::Cancelled => LoopState::Stopped,
        }
    }

    async fn run_stages(&mut self, iteration: u64) -> StageResult {
        let mut shutdown = self.shutdown.clone();
        let instrument = &self.config.instrument;
        let mode = self.config.mode;

        let fetch = tokio::time::timeout(
            self.config.fetch_timeout,
            self.source.fetch(instrument, mode, self.config.limit),
        );
        let fetched = tokio::select! {
            biased;
            _ = shutdown.wait() => return StageResult::Cancelled,
            fetched = fetch => fetched,
        };

        let series = match fetched {
            Err(_) => {
                return StageResult::Failed(format!(
                    "fetch timed out after {:?}",
                    self.config.fetch_timeout
                ))
            }
            Ok(Err(e)) => return StageResult::Failed(e.to_string()),
            Ok(Ok(series)) if series.is_empty() => {
                return StageResult::Failed("market data source returned no bars".to_string())
            }
            Ok(Ok(series)) => series,
        };
        debug!(symbol = instrument.id(), iteration, bars = series.len(), "Fetched market data");

        self.transition(LoopState::Analyzing);
        let snapshot = match self.engine.analyze(&series) {
            Some(snapshot) => snapshot,
            None => return StageResult::Failed("no analysis available".to_string()),
        };
        drop(series);

        self.transition(LoopState::Requesting);
        let instrument = self.config.instrument.clone();
        let request = SignalRequest::new(instrument.clone(), mode, snapshot);
        let requested = tokio::time::timeout(
            self.config.inference_timeout,
            self.client.request_signal(&request),
        );
        let outcome = tokio::select! {
            biased;
            _ = shutdown.wait() => return StageResult::Cancelled,
            outcome = requested => outcome.unwrap_or_else(|_| {
                Err(InferenceError::Timeout(self.config.inference_timeout.as_secs()))
            }),
        };

        StageResult::Produced(PipelineOutput::new(iteration, instrument, mode, outcome))
    }

    async fn wait(&mut self) -> LoopState {
        if let Some(max) = self.config.max_iterations {
            if self.stats.outputs >= max {
                info!(max_iterations = max, "Iteration limit reached");
                return LoopState::Stopped;
            }
        }

        let mut shutdown = self.shutdown.clone();
        match self.config.run_mode {
            RunMode::Continuous => {
                debug!("Next fetch in {:?}", self.config.poll_interval);
                tokio::select! {
                    biased;
                    _ = shutdown.wait() => LoopState::Stopped,
                    _ = self.sleeper.sleep(self.config.poll_interval) => LoopState::Fetching,
                }
            }
            RunMode::Confirm => {
                tokio::select! {
                    biased;
                    _ = shutdown.wait() => LoopState::Stopped,
                    again = self.prompt.ask() => {
                        if again {
                            LoopState::Fetching
                        } else {
                            LoopState::Stopped
                        }
                    }
                }
            }
        }
    }

    async fn retry(&mut self) -> LoopState {
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            biased;
            _ = shutdown.wait() => LoopState::Stopped,
            _ = self.sleeper.sleep(self.config.retry_delay) => LoopState::Fetching,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handle to a loop running on its own task.
pub struct LoopHandle {
    trigger: ShutdownTrigger,
    join: JoinHandle<LoopStats>,
}

impl LoopHandle {
    /// Ask the loop to stop. It stops at the next await point.
    pub fn shutdown(&self) {
        self.trigger.trigger();
    }

    /// A trigger that can be moved elsewhere, e.g. into a signal handler.
    pub fn trigger(&self) -> ShutdownTrigger {
        self.trigger.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop to stop and return its counters.
    pub async fn join(self) -> Result<LoopStats, PipelineError> {
        self.join.await.map_err(|e| {
            error!(error = %e, "Signal loop task failed");
            PipelineError::Internal(e.to_string())
        })
    }
}
