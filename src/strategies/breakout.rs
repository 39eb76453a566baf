//! Volatility-adaptive breakout of the recent high/low range.

use super::{Analysis, Evaluation, Strategy};
use crate::indicators::atr;
use crate::models::{Bar, Signal};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct BreakoutAnalysis {
    pub atr: f64,
    pub lookback: usize,
    /// Highest high of the range
    pub resistance: f64,
    /// Lowest low of the range
    pub support: f64,
    pub latest_volume: f64,
    pub avg_volume: f64,
}

/// Signals when the latest close breaks out of the range formed by the
/// preceding `lookback` bars on above-average volume.
///
/// The lookback adapts to volatility: calm markets (ATR below
/// `low_atr_threshold`) use `high_lookback`, volatile ones (ATR above
/// `high_atr_threshold`) use `low_lookback`, anything in between uses the
/// midpoint.
#[derive(Debug, Clone)]
pub struct BreakoutStrategy {
    atr_period: usize,
    low_atr_threshold: f64,
    high_atr_threshold: f64,
    low_lookback: usize,
    high_lookback: usize,
    volume_threshold: f64,
}

impl BreakoutStrategy {
    pub fn new(
        atr_period: usize,
        low_atr_threshold: f64,
        high_atr_threshold: f64,
        low_lookback: usize,
        high_lookback: usize,
        volume_threshold: f64,
    ) -> Self {
        Self {
            atr_period,
            low_atr_threshold,
            high_atr_threshold,
            low_lookback,
            high_lookback,
            volume_threshold,
        }
    }

    /// Lookback for the given ATR value.
    pub fn lookback_for(&self, atr: f64) -> usize {
        if atr < self.low_atr_threshold {
            self.high_lookback
        } else if atr > self.high_atr_threshold {
            self.low_lookback
        } else {
            (self.low_lookback + self.high_lookback) / 2
        }
    }
}

impl Strategy for BreakoutStrategy {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn min_bars(&self) -> usize {
        self.atr_period + 1
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        if series.len() < self.min_bars() {
            return Evaluation::noop();
        }

        let atr = atr(series, self.atr_period);
        let lookback = self.lookback_for(atr);
        trace!(atr, lookback, "Breakout: dynamic lookback");

        if lookback == 0 || series.len() < lookback + 1 {
            return Evaluation::noop();
        }

        let latest = &series[series.len() - 1];
        let range = &series[series.len() - 1 - lookback..series.len() - 1];

        let resistance = range.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let support = range.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let avg_volume = range.iter().map(|b| b.volume).sum::<f64>() / lookback as f64;

        let analysis = BreakoutAnalysis {
            atr,
            lookback,
            resistance,
            support,
            latest_volume: latest.volume,
            avg_volume,
        };

        let volume_confirmed = latest.volume > avg_volume * self.volume_threshold;
        let signal = if latest.close > resistance && volume_confirmed {
            Signal::Buy
        } else if latest.close < support && volume_confirmed {
            Signal::Sell
        } else {
            Signal::NoOp
        };

        Evaluation::new(signal, Analysis::Breakout(analysis))
    }
}
