//! Mean reversion with RSI confirmation.

use super::{Analysis, Evaluation, Strategy};
use crate::indicators::{rsi, sma, tail};
use crate::models::{Bar, Signal};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MeanReversionAnalysis {
    pub rsi: f64,
    /// (close - sma) / sma
    pub deviation: f64,
    pub sma: f64,
}

/// BUY when price is stretched below its mean and oversold, SELL when stretched
/// above and overbought.
#[derive(Debug, Clone)]
pub struct MeanReversionStrategy {
    lookback: usize,
    rsi_period: usize,
    deviation_threshold: f64,
}

impl MeanReversionStrategy {
    pub fn new(lookback: usize, rsi_period: usize, deviation_threshold: f64) -> Self {
        Self {
            lookback,
            rsi_period,
            deviation_threshold,
        }
    }
}

impl Strategy for MeanReversionStrategy {
    fn name(&self) -> &'static str {
        "MeanReversion"
    }

    fn min_bars(&self) -> usize {
        self.lookback.max(self.rsi_period + 1)
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        if self.lookback == 0 || series.len() < self.min_bars() {
            return Evaluation::noop();
        }

        let sma = sma(tail(series, self.lookback));
        if sma == 0.0 {
            return Evaluation::noop();
        }

        let close = series[series.len() - 1].close;
        let deviation = (close - sma) / sma;
        let rsi = rsi(series, self.rsi_period);

        let signal = if deviation < -self.deviation_threshold && rsi < RSI_OVERSOLD {
            Signal::Buy
        } else if deviation > self.deviation_threshold && rsi > RSI_OVERBOUGHT {
            Signal::Sell
        } else {
            Signal::NoOp
        };

        Evaluation::new(
            signal,
            Analysis::MeanReversion(MeanReversionAnalysis {
                rsi,
                deviation,
                sma,
            }),
        )
    }
}
