//! Bollinger band squeeze and breakout.

use super::{Analysis, Evaluation, Strategy};
use crate::indicators::{bollinger_bands, tail};
use crate::models::{Bar, Signal};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerAnalysis {
    pub sma: f64,
    pub upper: f64,
    pub lower: f64,
    pub width: f64,
    pub squeezed: bool,
}

/// Waits for the bands to contract (a squeeze) and trades the breakout that
/// follows. A squeeze with price still inside the bands is a SETUP.
#[derive(Debug, Clone)]
pub struct BollingerBandSqueezeStrategy {
    period: usize,
    k: f64,
    squeeze_threshold: f64,
}

impl BollingerBandSqueezeStrategy {
    pub fn new(period: usize, k: f64, squeeze_threshold: f64) -> Self {
        Self {
            period,
            k,
            squeeze_threshold,
        }
    }
}

impl Strategy for BollingerBandSqueezeStrategy {
    fn name(&self) -> &'static str {
        "BollingerBandSqueeze"
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        if self.period == 0 || series.len() < self.period {
            return Evaluation::noop();
        }

        let bands = bollinger_bands(tail(series, self.period), self.k);
        let squeezed = bands.width < self.squeeze_threshold;
        let analysis = Analysis::Bollinger(BollingerAnalysis {
            sma: bands.middle,
            upper: bands.upper,
            lower: bands.lower,
            width: bands.width,
            squeezed,
        });

        if !squeezed {
            return Evaluation::new(Signal::NoOp, analysis);
        }

        debug!(width = bands.width, "Bollinger band squeeze detected");
        let close = series[series.len() - 1].close;
        let signal = if close > bands.upper {
            Signal::Buy
        } else if close < bands.lower {
            Signal::Sell
        } else {
            Signal::Setup
        };
        Evaluation::new(signal, analysis)
    }
}
