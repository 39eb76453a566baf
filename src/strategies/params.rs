//! Strategy parameters as they appear in the configuration document.

use serde::{Deserialize, Serialize};

pub const DEFAULT_RSI_PERIOD: usize = 14;

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

/// Thresholds shared by several strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub atr_period: usize,
    pub low_atr_threshold: f64,
    pub high_atr_threshold: f64,
    /// Lookback used when volatility is high
    pub low_lookback: usize,
    /// Lookback used when volatility is low
    pub high_lookback: usize,
    pub volume_threshold: f64,
    /// Mean reversion deviation from the SMA, as a fraction
    pub deviation: f64,
    /// Bollinger band width below which the bands count as squeezed
    pub squeeze: f64,
    pub min_momentum_return: f64,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
    pub trigger_distance: f64,
}

/// Everything a strategy factory may draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub thresholds: Thresholds,
    pub macd: Option<MacdParams>,
    pub lookback: usize,
    pub momentum_lookback: usize,
    pub bollinger_coefficient: f64,
}
