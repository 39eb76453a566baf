//! Clients for the collaborators the scanner talks to.

pub mod advisor;
pub mod chart_service;
pub mod market_data;

pub use advisor::{Advisor, AdvisorConfig, AdvisorError, GeminiAdvisor};
pub use chart_service::ChartServiceClient;
pub use market_data::{MarketDataError, MarketDataProvider, Timeframe};
