//! MACD / signal line crossover.

use super::params::MacdParams;
use super::{Analysis, Evaluation, Strategy};
use crate::indicators::{ema, ema_closes};
use crate::models::{Bar, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct MacdAnalysis {
    /// MACD minus signal line on the previous bar
    pub prev_delta: f64,
    /// MACD minus signal line on the latest bar
    pub delta: f64,
    pub trigger_distance: f64,
}

/// BUY when the MACD line crosses above its signal line by more than the
/// trigger distance, SELL on the symmetric downward cross.
#[derive(Debug, Clone)]
pub struct MacdStrategy {
    params: MacdParams,
}

impl MacdStrategy {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn min_bars(&self) -> usize {
        (self.params.slow_period + self.params.signal_period).max(2)
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        if series.len() < self.min_bars() {
            return Evaluation::noop();
        }

        let fast = ema_closes(series, self.params.fast_period);
        let slow = ema_closes(series, self.params.slow_period);
        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = ema(&macd_line, self.params.signal_period);

        let n = macd_line.len();
        let prev_delta = macd_line[n - 2] - signal_line[n - 2];
        let delta = macd_line[n - 1] - signal_line[n - 1];
        let trigger = self.params.trigger_distance;

        let signal = if prev_delta < 0.0 && delta > trigger {
            Signal::Buy
        } else if prev_delta > 0.0 && delta < -trigger {
            Signal::Sell
        } else {
            Signal::NoOp
        };

        Evaluation::new(
            signal,
            Analysis::Macd(MacdAnalysis {
                prev_delta,
                delta,
                trigger_distance: trigger,
            }),
        )
    }
}
