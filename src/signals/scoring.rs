//! Risk and opportunity classification

use crate::models::{Bar, OpportunityLevel, RiskLevel};

/// Bars needed before volatility is measured at all.
pub const RISK_WINDOW: usize = 20;

const HIGH_VOLATILITY: f64 = 5.0;
const MEDIUM_VOLATILITY: f64 = 2.0;
const THIN_VOLUME: f64 = 50_000.0;
const MODERATE_VOLUME: f64 = 200_000.0;

const HIGH_OPPORTUNITY_SCORE: f64 = 3.0;
const MEDIUM_OPPORTUNITY_SCORE: f64 = 1.5;
const HIGH_OPPORTUNITY_BUYS: usize = 3;
const MEDIUM_OPPORTUNITY_BUYS: usize = 2;

/// Mean of squared daily returns over the last `RISK_WINDOW` returns, ×100.
pub fn volatility(series: &[Bar]) -> f64 {
    let start = series.len().saturating_sub(RISK_WINDOW + 1);
    let returns: Vec<f64> = series[start..]
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = returns.iter().map(|r| r * r).sum();
    sum_sq / returns.len() as f64 * 100.0
}

/// Classify risk from recent volatility and the latest volume.
pub fn calculate_risk(series: &[Bar], volume: f64) -> RiskLevel {
    if series.len() < RISK_WINDOW {
        return RiskLevel::High;
    }
    let vol = volatility(series);
    if vol > HIGH_VOLATILITY || volume < THIN_VOLUME {
        RiskLevel::High
    } else if vol > MEDIUM_VOLATILITY || volume < MODERATE_VOLUME {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Classify opportunity from the ensemble outcome.
pub fn calculate_opportunity(weighted_score: f64, confidence: f64, buy_signals: usize) -> OpportunityLevel {
    let score = weighted_score + confidence * 2.0;
    if score >= HIGH_OPPORTUNITY_SCORE && buy_signals >= HIGH_OPPORTUNITY_BUYS {
        OpportunityLevel::High
    } else if score >= MEDIUM_OPPORTUNITY_SCORE && buy_signals >= MEDIUM_OPPORTUNITY_BUYS {
        OpportunityLevel::Medium
    } else {
        OpportunityLevel::Low
    }
}
