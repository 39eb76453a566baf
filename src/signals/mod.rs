//! Turning per-strategy votes into a ranked list of stock scores.

pub mod aggregation;
pub mod filters;
pub mod scoring;

pub use aggregation::{SignalTally, CONFIDENCE_SETUP_WEIGHT};
pub use filters::{filter_results, sort_by_opportunity};
pub use scoring::{calculate_opportunity, calculate_risk};
