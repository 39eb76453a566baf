//! Rate of change over a fixed lookback.

use super::{Analysis, Evaluation, Strategy};
use crate::models::{Bar, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumAnalysis {
    /// Fractional change, 0.05 = +5%
    pub change: f64,
    pub lookback: usize,
}

/// Compares the latest close with the close `lookback + 1` bars back.
#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    lookback: usize,
    min_return: f64,
}

impl MomentumStrategy {
    pub fn new(lookback: usize, min_return: f64) -> Self {
        Self {
            lookback,
            min_return,
        }
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &'static str {
        "Momentum"
    }

    fn min_bars(&self) -> usize {
        self.lookback + 1
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        if series.len() < self.min_bars() {
            return Evaluation::noop();
        }

        let start = series[series.len() - self.lookback - 1].close;
        let end = series[series.len() - 1].close;
        if start == 0.0 {
            return Evaluation::noop();
        }

        let change = (end - start) / start;
        let signal = if change > self.min_return {
            Signal::Buy
        } else if change < -self.min_return {
            Signal::Sell
        } else {
            Signal::NoOp
        };

        Evaluation::new(
            signal,
            Analysis::Momentum(MomentumAnalysis {
                change,
                lookback: self.lookback,
            }),
        )
    }
}
