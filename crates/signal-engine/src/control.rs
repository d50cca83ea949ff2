//! Sleep, continue-prompt and cancellation seams.

use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Waits between iterations.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Asks whether another iteration should run (confirm mode).
#[async_trait]
pub trait ContinuePrompt: Send + Sync {
    /// `true` to run another iteration.
    async fn ask(&self) -> bool;
}

/// Prompts on stdout and reads the answer from stdin.
///
/// Only `y` or `yes` (any case) continue; anything else, including EOF or
/// a read error, stops.
#[derive(Debug, Clone)]
pub struct StdinPrompt {
    question: String,
}

impl StdinPrompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    fn is_yes(answer: &str) -> bool {
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new("Fetch another signal? (y/n): ")
    }
}

#[async_trait]
impl ContinuePrompt for StdinPrompt {
    async fn ask(&self) -> bool {
        let question = self.question.clone();
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stdout = io::stdout();
            stdout.write_all(question.as_bytes())?;
            stdout.flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => Self::is_yes(&line),
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to read answer, stopping");
                false
            }
            Err(e) => {
                warn!(error = %e, "Prompt task failed, stopping");
                false
            }
        }
    }
}

/// Sending half of a cancellation channel.
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Request cancellation. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of a cancellation channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// A handle that is never triggered.
    pub fn never() -> Self {
        let (_, shutdown) = shutdown_channel();
        shutdown
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation has been requested.
    ///
    /// Pends forever if every trigger has been dropped without firing.
    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Create a connected trigger/shutdown pair.
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}
