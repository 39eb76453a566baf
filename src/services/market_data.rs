//! Market data provider interface.

use crate::models::Bar;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

impl MarketDataError {
    /// Worth retrying: connection problems, timeouts and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            MarketDataError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            MarketDataError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Period of history requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1m")]
    Monthly,
    #[serde(rename = "3m")]
    Quarterly,
    #[serde(rename = "6m")]
    HalfYearly,
    #[serde(rename = "1y")]
    Yearly,
    #[serde(rename = "3y")]
    Triennial,
    #[serde(rename = "5y")]
    Quinquennial,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Monthly => "1m",
            Timeframe::Quarterly => "3m",
            Timeframe::HalfYearly => "6m",
            Timeframe::Yearly => "1y",
            Timeframe::Triennial => "3y",
            Timeframe::Quinquennial => "5y",
        }
    }

    /// Bar granularity requested for this timeframe: one-minute bars for a
    /// single day, daily bars otherwise.
    pub fn sample_time(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1mm",
            _ => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "daily" => Ok(Timeframe::Daily),
            "1m" | "monthly" => Ok(Timeframe::Monthly),
            "3m" | "quarterly" => Ok(Timeframe::Quarterly),
            "6m" | "halfyearly" => Ok(Timeframe::HalfYearly),
            "1y" | "yearly" => Ok(Timeframe::Yearly),
            "3y" | "triennial" => Ok(Timeframe::Triennial),
            "5y" | "quinquennial" => Ok(Timeframe::Quinquennial),
            other => Err(format!("unknown timeframe {:?}", other)),
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Bars for `symbol` in non-decreasing timestamp order. An empty vector
    /// means the source has no data; it is not an error.
    async fn get_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, MarketDataError>;
}
