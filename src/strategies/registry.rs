//! Strategy registry: identifier -> factory.

use super::params::StrategyParams;
use super::{
    BollingerBandSqueezeStrategy, BreakoutStrategy, MacdStrategy, MeanReversionStrategy,
    MomentumStrategy, Strategy, VwapStrategy,
};
use crate::config::ConfigError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds a strategy from the shared parameters, validating what it needs.
pub type StrategyFactory = fn(&StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError>;

/// Maps strategy identifiers to factories.
///
/// Identifiers are matched case-insensitively with `-` and `_` ignored, so
/// `mean-reversion`, `MEAN_REVERSION` and `meanReversion` all resolve to the
/// same entry.
#[derive(Clone)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Create a registry with the built-in strategies
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("breakout", build_breakout);
        registry.register("vwap", build_vwap);
        registry.register("meanreversion", build_mean_reversion);
        registry.register("bollinger", build_bollinger);
        registry.register("macd", build_macd);
        registry.register("momentum", build_momentum);
        registry
    }

    pub fn register(&mut self, name: &str, factory: StrategyFactory) {
        self.factories.insert(normalize(name), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&normalize(name))
    }

    /// Registered identifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn build(
        &self,
        name: &str,
        params: &StrategyParams,
    ) -> Result<Arc<dyn Strategy>, ConfigError> {
        let factory = self
            .factories
            .get(&normalize(name))
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))?;
        factory(params)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn require_positive(strategy: &str, field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidParameter {
            strategy: strategy.to_string(),
            message: format!("{} must be greater than 0", field),
        });
    }
    Ok(())
}

fn build_breakout(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    let t = &params.thresholds;
    require_positive("breakout", "thresholds.atr_period", t.atr_period)?;
    if t.low_lookback == 0 && t.high_lookback == 0 {
        return Err(ConfigError::InvalidParameter {
            strategy: "breakout".to_string(),
            message: "low_lookback and high_lookback cannot both be 0".to_string(),
        });
    }
    Ok(Arc::new(BreakoutStrategy::new(
        t.atr_period,
        t.low_atr_threshold,
        t.high_atr_threshold,
        t.low_lookback,
        t.high_lookback,
        t.volume_threshold,
    )))
}

fn build_vwap(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    require_positive("vwap", "lookback", params.lookback)?;
    Ok(Arc::new(VwapStrategy::new(params.lookback)))
}

fn build_mean_reversion(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    require_positive("meanreversion", "lookback", params.lookback)?;
    require_positive(
        "meanreversion",
        "thresholds.rsi_period",
        params.thresholds.rsi_period,
    )?;
    Ok(Arc::new(MeanReversionStrategy::new(
        params.lookback,
        params.thresholds.rsi_period,
        params.thresholds.deviation,
    )))
}

fn build_bollinger(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    require_positive("bollinger", "lookback", params.lookback)?;
    Ok(Arc::new(BollingerBandSqueezeStrategy::new(
        params.lookback,
        params.bollinger_coefficient,
        params.thresholds.squeeze,
    )))
}

fn build_macd(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    let macd = params
        .macd
        .clone()
        .ok_or(ConfigError::MissingField("macd_params"))?;
    require_positive("macd", "macd_params.fast_period", macd.fast_period)?;
    require_positive("macd", "macd_params.slow_period", macd.slow_period)?;
    require_positive("macd", "macd_params.signal_period", macd.signal_period)?;
    Ok(Arc::new(MacdStrategy::new(macd)))
}

fn build_momentum(params: &StrategyParams) -> Result<Arc<dyn Strategy>, ConfigError> {
    require_positive("momentum", "momentum_lookback", params.momentum_lookback)?;
    Ok(Arc::new(MomentumStrategy::new(
        params.momentum_lookback,
        params.thresholds.min_momentum_return,
    )))
}
