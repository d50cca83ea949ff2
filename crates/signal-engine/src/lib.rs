//! The market-data-to-signal polling loop.
//!
//! [`PollingLoop`] runs fetch, analysis and inference for a single
//! instrument, one iteration at a time, and reports every state change and
//! every produced signal to its [`PipelineObserver`]s. Sleeping, the
//! continue prompt and cancellation are injected so the loop can be driven
//! deterministically in tests.

pub mod control;
pub mod output;
pub mod polling;
pub mod state;

pub use control::{shutdown_channel, ContinuePrompt, Shutdown, ShutdownTrigger, Sleeper, StdinPrompt, TokioSleeper};
pub use output::{PipelineObserver, PipelineOutput, TracingObserver};
pub use polling::{LoopHandle, PollingLoop};
pub use state::{LoopConfig, LoopState, LoopStats, RunMode};
