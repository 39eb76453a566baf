//! Strategies turn a bar series into a [`Signal`] plus the intermediate values
//! that explain it.
//!
//! Strategies are immutable once built and hold no per-call state: every
//! [`Strategy::execute`] returns its analysis snapshot inside the
//! [`Evaluation`], so one instance can be shared by any number of concurrent
//! workers.

pub mod analysis;
pub mod bollinger;
pub mod breakout;
pub mod macd;
pub mod mean_reversion;
pub mod momentum;
pub mod params;
pub mod registry;
pub mod vwap;

use crate::models::{Bar, Signal};
use std::fmt;
use std::sync::Arc;

pub use bollinger::{BollingerAnalysis, BollingerBandSqueezeStrategy};
pub use breakout::{BreakoutAnalysis, BreakoutStrategy};
pub use macd::{MacdAnalysis, MacdStrategy};
pub use mean_reversion::{MeanReversionAnalysis, MeanReversionStrategy};
pub use momentum::{MomentumAnalysis, MomentumStrategy};
pub use params::{MacdParams, StrategyParams, Thresholds};
pub use registry::StrategyRegistry;
pub use vwap::{VwapAnalysis, VwapStrategy};

/// Trait for all strategies
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Name used in reports and reasoning strings
    fn name(&self) -> &'static str;

    /// Fewest bars for which the strategy can produce anything other than NoOp
    fn min_bars(&self) -> usize;

    /// Evaluate the series. Series that are too short yield NoOp, never an error.
    fn execute(&self, series: &[Bar]) -> Evaluation;
}

/// Intermediate values of the last computation, kept for reporting only.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Breakout(BreakoutAnalysis),
    Vwap(VwapAnalysis),
    MeanReversion(MeanReversionAnalysis),
    Bollinger(BollingerAnalysis),
    Macd(MacdAnalysis),
    Momentum(MomentumAnalysis),
}

/// Result of one [`Strategy::execute`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub signal: Signal,
    pub analysis: Option<Analysis>,
}

impl Evaluation {
    pub fn new(signal: Signal, analysis: Analysis) -> Self {
        Self {
            signal,
            analysis: Some(analysis),
        }
    }

    /// Undecided, nothing was computed.
    pub fn noop() -> Self {
        Self {
            signal: Signal::NoOp,
            analysis: None,
        }
    }
}

/// A strategy and its relative weight in the ensemble.
#[derive(Debug, Clone)]
pub struct StrategyWeight {
    pub strategy: Arc<dyn Strategy>,
    pub weight: f64,
}

impl StrategyWeight {
    pub fn new(strategy: Arc<dyn Strategy>, weight: f64) -> Self {
        Self { strategy, weight }
    }
}
