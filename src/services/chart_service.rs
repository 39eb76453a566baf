//! HTTP client for the chart web service (`GetPricesWithVolume`).

use super::market_data::{MarketDataError, MarketDataProvider, Timeframe};
use crate::config::get_chart_service_url;
use crate::models::Bar;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const PRICES_ENDPOINT: &str = "/charts/services/ChartWService.asmx/GetPricesWithVolume";

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct PricesRequest<'a> {
    request: PricesRequestInner<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PricesRequestInner<'a> {
    sample_time: &'a str,
    time_frame: &'a str,
    requested_data_set_type: &'a str,
    chart_price_type: &'a str,
    key: &'a str,
    off_set: i64,
    from_date: Option<&'a str>,
    to_date: Option<&'a str>,
    use_delay: bool,
    key_type: &'a str,
    key_type2: &'a str,
    language: &'a str,
}

impl<'a> PricesRequest<'a> {
    fn new(symbol: &'a str, timeframe: Timeframe) -> Self {
        Self {
            request: PricesRequestInner {
                sample_time: timeframe.sample_time(),
                time_frame: timeframe.as_str(),
                requested_data_set_type: "ohlc",
                chart_price_type: "price",
                key: symbol,
                off_set: 0,
                from_date: None,
                to_date: None,
                use_delay: false,
                key_type: "Topic",
                key_type2: "Topic",
                language: "it-IT",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PricesResponse {
    #[serde(default)]
    d: Vec<Vec<Value>>,
}

/// Reads a numeric cell; missing or non-numeric cells read as 0.
fn cell(row: &[Value], index: usize) -> f64 {
    match row.get(index) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Rows are `[timestamp_ms, open, high, low, close, weighted_average, volume]`.
fn decode_rows(rows: &[Vec<Value>]) -> Vec<Bar> {
    let mut bars: Vec<Bar> = rows
        .iter()
        .map(|row| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(cell(row, 0) as i64)
                .unwrap_or_default();
            Bar::new(
                cell(row, 1),
                cell(row, 2),
                cell(row, 3),
                cell(row, 4),
                cell(row, 6),
                timestamp,
            )
            .with_weighted_average(cell(row, 5))
        })
        .collect();
    bars.sort_by_key(|b| b.timestamp);
    bars
}

/// Fetches OHLCV series from the chart service, retrying transient failures
/// with exponential backoff.
#[derive(Debug, Clone)]
pub struct ChartServiceClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: usize,
    retry_delay: Duration,
}

impl ChartServiceClient {
    /// Client for the base URL from the environment.
    pub fn new() -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(get_chart_service_url(), client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retries(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let url = format!("{}{}", self.base_url, PRICES_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("origin", &self.base_url)
            .header("x-requested-with", "XMLHttpRequest")
            .json(&PricesRequest::new(symbol, timeframe))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: PricesResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;
        Ok(decode_rows(&payload.d))
    }
}

#[async_trait]
impl MarketDataProvider for ChartServiceClient {
    async fn get_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        let bars = (|| self.fetch_once(symbol, timeframe))
            .retry(backoff)
            .when(MarketDataError::is_transient)
            .notify(|err: &MarketDataError, delay: Duration| {
                warn!(symbol, error = %err, ?delay, "ChartService: retrying request");
            })
            .await?;

        debug!(symbol, %timeframe, count = bars.len(), "ChartService: fetched series");
        Ok(bars)
    }
}
