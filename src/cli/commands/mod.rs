//! CLI command implementations.

pub mod analyze;
pub mod gainers;
pub mod run_loop;
pub mod validate;
