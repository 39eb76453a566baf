//! Tallying the votes of a strategy ensemble.

use crate::models::{Bar, Signal, StockScore};
use crate::signals::scoring::{calculate_opportunity, calculate_risk};
use crate::strategies::{Evaluation, StrategyWeight};

/// A SETUP vote counts as half a BUY towards confidence.
pub const CONFIDENCE_SETUP_WEIGHT: f64 = 0.5;

/// Vote counts and accumulated weight per signal kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalTally {
    pub buy: usize,
    pub sell: usize,
    pub hold: usize,
    pub setup: usize,
    pub buy_weight: f64,
    pub sell_weight: f64,
    pub hold_weight: f64,
    pub setup_weight: f64,
    pub reasoning: Vec<String>,
}

impl SignalTally {
    pub fn record(&mut self, name: &str, signal: Signal, weight: f64) {
        match signal {
            Signal::Buy => {
                self.buy += 1;
                self.buy_weight += weight;
                self.reasoning.push(format!("{} suggests {}", name, signal.label()));
            }
            Signal::Sell => {
                self.sell += 1;
                self.sell_weight += weight;
            }
            Signal::Setup => {
                self.setup += 1;
                self.setup_weight += weight;
            }
            Signal::NoOp => {
                self.hold += 1;
                self.hold_weight += weight;
            }
        }
    }

    /// Tally an ensemble whose evaluations are given in ensemble order.
    pub fn from_evaluations(strategies: &[StrategyWeight], evaluations: &[Evaluation]) -> Self {
        let mut tally = Self::default();
        for (entry, evaluation) in strategies.iter().zip(evaluations) {
            tally.record(entry.strategy.name(), evaluation.signal, entry.weight);
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.buy + self.sell + self.hold + self.setup
    }

    pub fn weighted_score(&self) -> f64 {
        self.buy_weight - self.sell_weight
    }

    /// Share of the ensemble leaning bullish, in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.buy as f64 + CONFIDENCE_SETUP_WEIGHT * self.setup as f64) / total as f64
    }

    /// Percentage of votes for `signal`.
    pub fn percentage(&self, signal: Signal) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match signal {
            Signal::Buy => self.buy,
            Signal::Sell => self.sell,
            Signal::Setup => self.setup,
            Signal::NoOp => self.hold,
        };
        count as f64 / total as f64 * 100.0
    }

    /// Build the score of `symbol`. `series` must be non-empty.
    pub fn into_score(self, symbol: &str, series: &[Bar]) -> StockScore {
        let (last_price, volume) = series
            .last()
            .map(|bar| (bar.close, bar.volume))
            .unwrap_or_default();
        let weighted_score = self.weighted_score();
        let confidence = self.confidence();
        let risk = calculate_risk(series, volume);
        let opportunity = calculate_opportunity(weighted_score, confidence, self.buy);

        StockScore {
            symbol: symbol.to_string(),
            last_price,
            volume,
            buy_signals: self.buy,
            sell_signals: self.sell,
            hold_signals: self.hold,
            setup_signals: self.setup,
            weighted_score,
            confidence,
            risk,
            opportunity,
            reasoning: self.reasoning,
        }
    }
}
