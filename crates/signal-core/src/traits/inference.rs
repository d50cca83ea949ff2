//! Signal client trait definition.

use crate::error::InferenceError;
use crate::types::{SignalRequest, SignalResponse};
use async_trait::async_trait;

/// Trait for services that turn an indicator snapshot into a recommendation.
#[async_trait]
pub trait SignalClient: Send + Sync {
    /// Ask for a recommendation.
    ///
    /// A reply whose text is not a well-formed recommendation is still
    /// `Ok`; only transport, status and envelope problems are errors.
    async fn request_signal(&self, request: &SignalRequest) -> Result<SignalResponse, InferenceError>;

    /// Get the client name.
    fn name(&self) -> &str;
}
