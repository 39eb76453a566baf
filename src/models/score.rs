//! Per-symbol scan results and the thresholds used to filter them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk classification, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Opportunity classification, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OpportunityLevel {
    Low,
    Medium,
    High,
}

fn level_name(index: u8) -> &'static str {
    match index {
        0 => "Low",
        1 => "Medium",
        _ => "High",
    }
}

fn parse_level(value: &str, kind: &str) -> Result<u8, String> {
    match value.trim().to_ascii_uppercase().as_str() {
        "LOW" => Ok(0),
        "MEDIUM" => Ok(1),
        "HIGH" => Ok(2),
        _ => Err(format!("invalid {}: {:?}", kind, value)),
    }
}

impl TryFrom<String> for RiskLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(match parse_level(&value, "risk level")? {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        })
    }
}

impl TryFrom<String> for OpportunityLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ok(match parse_level(&value, "opportunity level")? {
            0 => OpportunityLevel::Low,
            1 => OpportunityLevel::Medium,
            _ => OpportunityLevel::High,
        })
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(level_name(*self as u8))
    }
}

impl fmt::Display for OpportunityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(level_name(*self as u8))
    }
}

/// Inclusive thresholds a [`StockScore`] must meet to survive a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanFilters {
    pub min_confidence: f64,
    pub min_weighted_score: f64,
    pub max_risk: RiskLevel,
    pub min_opportunity: OpportunityLevel,
    pub min_volume: f64,
    /// Minimum number of BUY votes, or of SETUP votes.
    pub required_signals: usize,
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            min_weighted_score: 1.0,
            max_risk: RiskLevel::Medium,
            min_opportunity: OpportunityLevel::Medium,
            min_volume: 100_000.0,
            required_signals: 2,
        }
    }
}

impl ScanFilters {
    /// Filters that let every score through.
    pub fn permissive() -> Self {
        Self {
            min_confidence: 0.0,
            min_weighted_score: -100.0,
            max_risk: RiskLevel::High,
            min_opportunity: OpportunityLevel::Low,
            min_volume: 0.0,
            required_signals: 0,
        }
    }

    pub fn accepts(&self, score: &StockScore) -> bool {
        score.confidence >= self.min_confidence
            && score.weighted_score >= self.min_weighted_score
            && score.risk <= self.max_risk
            && score.opportunity >= self.min_opportunity
            && score.volume >= self.min_volume
            && (score.buy_signals >= self.required_signals
                || score.setup_signals >= self.required_signals)
    }
}

/// Aggregate evaluation of one symbol in one scan cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockScore {
    pub symbol: String,
    pub last_price: f64,
    pub volume: f64,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub hold_signals: usize,
    pub setup_signals: usize,
    pub weighted_score: f64,
    pub confidence: f64,
    pub risk: RiskLevel,
    pub opportunity: OpportunityLevel,
    pub reasoning: Vec<String>,
}
