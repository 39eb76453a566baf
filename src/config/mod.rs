//! Configuration: the JSON scan document and process environment.

use crate::models::ScanFilters;
use crate::strategies::{MacdParams, StrategyParams, StrategyRegistry, StrategyWeight, Thresholds};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_MAX_CONCURRENCY: usize = 5;
pub const DEFAULT_BOLLINGER_COEFFICIENT: f64 = 2.0;
pub const DEFAULT_CHART_SERVICE_URL: &str = "https://charts.borsaitaliana.it";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no {0} specified")]
    MissingField(&'static str),
    #[error("at least one strategy must be specified")]
    NoStrategies,
    #[error("unknown strategy {0:?}")]
    UnknownStrategy(String),
    #[error("invalid weight {weight} for strategy {strategy:?}: weights must be finite and nonnegative")]
    InvalidWeight { strategy: String, weight: f64 },
    #[error("invalid parameters for strategy {strategy:?}: {message}")]
    InvalidParameter { strategy: String, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_bollinger_coefficient() -> f64 {
    DEFAULT_BOLLINGER_COEFFICIENT
}

#[derive(Debug, Deserialize)]
struct RawStrategy {
    strategy: String,
    #[serde(default)]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    thresholds: Option<Thresholds>,
    macd_params: Option<MacdParams>,
    scan_filters: Option<ScanFilters>,
    #[serde(default)]
    strategies: Vec<RawStrategy>,
    #[serde(default)]
    stock_universe: Vec<String>,
    #[serde(default)]
    lookback: usize,
    #[serde(default, alias = "momentum_look_back")]
    momentum_lookback: usize,
    #[serde(default = "default_bollinger_coefficient")]
    bollinger_coefficient: f64,
    max_concurrency: Option<usize>,
}

/// Validated scan configuration with the strategy ensemble already built.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub params: StrategyParams,
    pub filters: ScanFilters,
    pub strategies: Vec<StrategyWeight>,
    pub universe: Vec<String>,
    pub max_concurrency: usize,
}

impl ScanConfig {
    /// Parse and validate a JSON document using the built-in strategies.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Self::from_json_with_registry(data, &StrategyRegistry::new())
    }

    pub fn from_json_with_registry(
        data: &str,
        registry: &StrategyRegistry,
    ) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(data)?;
        let thresholds = raw.thresholds.ok_or(ConfigError::MissingField("thresholds"))?;

        if raw.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }

        let params = StrategyParams {
            thresholds,
            macd: raw.macd_params,
            lookback: raw.lookback,
            momentum_lookback: raw.momentum_lookback,
            bollinger_coefficient: raw.bollinger_coefficient,
        };

        let strategies = raw
            .strategies
            .iter()
            .map(|entry| {
                if !entry.weight.is_finite() || entry.weight < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        strategy: entry.strategy.clone(),
                        weight: entry.weight,
                    });
                }
                let strategy = registry.build(&entry.strategy, &params)?;
                debug!(strategy = strategy.name(), weight = entry.weight, "Config: strategy loaded");
                Ok(StrategyWeight::new(strategy, entry.weight))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let max_concurrency = raw.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        if raw.stock_universe.is_empty() {
            warn!("Config: stock_universe is empty, scans will have nothing to evaluate");
        }

        Ok(Self {
            params,
            filters: raw.scan_filters.unwrap_or_default(),
            strategies,
            universe: raw.stock_universe,
            max_concurrency,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }
}

/// Deployment environment from `APP_ENV`, defaulting to `development`.
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|_| "development".to_string())
}

/// Base URL of the chart service, `CHART_SERVICE_URL` when set.
pub fn get_chart_service_url() -> String {
    env::var("CHART_SERVICE_URL").unwrap_or_else(|_| DEFAULT_CHART_SERVICE_URL.to_string())
}
