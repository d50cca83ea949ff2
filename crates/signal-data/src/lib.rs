//! Market data sources.
//!
//! This crate provides HTTP-backed implementations of
//! [`MarketDataSource`](signal_core::traits::MarketDataSource):
//! - Binance spot and futures klines
//! - BingX klines and the top-gainers ticker list
//! - Exchange-rate quotes for forex pairs
//!
//! [`MarketRouter`] picks the right source for an instrument.

pub mod binance;
pub mod bingx;
pub mod forex;
mod http;
mod kline;
pub mod router;

pub use binance::{BinanceConfig, BinanceSource};
pub use bingx::{BingxConfig, BingxSource, Gainer};
pub use forex::{ForexConfig, ForexSource};
pub use router::MarketRouter;
