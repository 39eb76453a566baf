//! Shared data models spanning the engine layers.

pub mod bar;
pub mod score;
pub mod signal;

pub use bar::Bar;
pub use score::{OpportunityLevel, RiskLevel, ScanFilters, StockScore};
pub use signal::Signal;
