//! Core traits for the signal pipeline.

mod data_source;
mod indicator;
mod inference;

pub use data_source::MarketDataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use inference::SignalClient;
