//! Logging and console output.

mod console;
mod logging;

pub use console::{render_output, render_snapshot, ConsoleObserver};
pub use logging::setup_logging;
