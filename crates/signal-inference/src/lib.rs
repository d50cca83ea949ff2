//! Inference client for trading signals.
//!
//! Builds the indicator prompt for an instrument and sends it to an
//! OpenRouter-compatible chat-completions endpoint. Replies are returned
//! verbatim together with the parsed
//! [`Recommendation`](signal_core::types::Recommendation).

pub mod openrouter;
pub mod prompt;

pub use openrouter::{InferenceConfig, OpenRouterClient, DEFAULT_MODEL, SYSTEM_PROMPT};
pub use prompt::build_prompt;
