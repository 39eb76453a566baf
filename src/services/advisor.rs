//! Optional natural-language advisor consulted after an analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ADVISOR_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ADVISOR_MODEL: &str = "gemini-2.5-pro";

const PREMISE: &str = "You are a expert financial advisor. Your job is to analyze the technical data and recent market context of a stock or ETF, and recommend a single, clear action: BUY, HOLD, or SELL.";

const INSTRUCTIONS: &str = "You must:
1. Analyze the provided technical signals.
2. Search for and incorporate up-to-date news, events, and sentiment about the asset from the web. Consider macroeconomic news, earnings, geopolitical events, or sector-wide changes.
3. Weigh your recommendation according to the provided RISK TOLERANCE:
   - LOW: Avoid risky trades; prioritize capital preservation.
   - MEDIUM: Take moderate risk for reasonable returns.
   - HIGH: Accept volatility in pursuit of higher gains.";

const OUTPUT_RULES: &str = "Your response must:
- Be no more than 2 concise sentences.
- Provide a direct recommendation: BUY, HOLD, or SELL.
- Justify the recommendation based on both technicals and recent events.
- In case your recommendation is to:
  - BUY: include a suggested purchase price (e.g. near current BID, near daily lowest, market value)
  - SELL: include a suggested sell price (e.g. near current ASK, near daily highest, market value)
- Do not repeat the raw input.
- Think through your reasoning silently; return only the final result.";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("failed to read advisor configuration {path}: {message}")]
    Config { path: String, message: String },
    #[error("advisor request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advisor returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("advisor returned no recommendation")]
    Empty,
}

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Recommendation for `symbol` given a plain text summary of the technical
    /// analysis and the user's maximum risk tolerance.
    async fn advise(
        &self,
        summary: &str,
        risk_tolerance: &str,
        symbol: &str,
    ) -> Result<String, AdvisorError>;
}

fn default_model() -> String {
    DEFAULT_ADVISOR_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_ADVISOR_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl AdvisorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AdvisorError> {
        let path = path.as_ref();
        let config_error = |message: String| AdvisorError::Config {
            path: path.display().to_string(),
            message,
        };
        let data = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| config_error(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Advisor backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: AdvisorConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: AdvisorConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn request_body(summary: &str, risk_tolerance: &str, symbol: &str) -> serde_json::Value {
        json!({
            "systemInstruction": {
                "parts": [
                    { "text": PREMISE },
                    { "text": INSTRUCTIONS },
                    { "text": OUTPUT_RULES }
                ]
            },
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": format!("Assume the maximum risk the user is willing to take is {}", risk_tolerance) },
                    { "text": format!("The ticker for the asset is: {}", symbol) },
                    { "text": format!("Input:\n{}", summary) }
                ]
            }],
            "generationConfig": {
                "temperature": 0.2,
                "candidateCount": 1,
                "responseMimeType": "text/plain"
            }
        })
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn advise(
        &self,
        summary: &str,
        risk_tolerance: &str,
        symbol: &str,
    ) -> Result<String, AdvisorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        debug!(symbol, model = %self.config.model, "Advisor: requesting recommendation");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&Self::request_body(summary, risk_tolerance, symbol))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response.json().await?;
        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdvisorError::Empty);
        }
        Ok(text.trim().to_string())
    }
}
