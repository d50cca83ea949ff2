//! Core types and traits for the market signal pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Series, Timeframe, Instrument)
//! - The indicator snapshot and signal request/response types
//! - The error taxonomy shared by every stage
//! - Seam traits for indicators, market data sources and signal clients

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    FetchError, IndicatorError, InferenceError, InstrumentError, MalformedSignal, PipelineError,
    PipelineResult,
};
pub use traits::*;
pub use types::*;
