//! Numeric and parsing helpers shared across the crate.

pub mod math;
pub mod time;
