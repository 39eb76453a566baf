//! Close versus volume weighted average price.

use super::{Analysis, Evaluation, Strategy};
use crate::indicators::tail;
use crate::models::{Bar, Signal};

#[derive(Debug, Clone, PartialEq)]
pub struct VwapAnalysis {
    pub close: f64,
    pub vwap: f64,
}

/// BUY above VWAP, SELL below, NoOp when equal.
///
/// VWAP is computed over the last `lookback` bars, or all available bars when
/// the series is shorter.
#[derive(Debug, Clone)]
pub struct VwapStrategy {
    lookback: usize,
}

impl VwapStrategy {
    pub fn new(lookback: usize) -> Self {
        Self { lookback }
    }
}

impl Strategy for VwapStrategy {
    fn name(&self) -> &'static str {
        "VWAP"
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn execute(&self, series: &[Bar]) -> Evaluation {
        let Some(latest) = series.last() else {
            return Evaluation::noop();
        };
        if self.lookback == 0 {
            return Evaluation::noop();
        }

        let window = tail(series, self.lookback);
        let (price_volume, volume) = window.iter().fold((0.0, 0.0), |(pv, v), bar| {
            (pv + bar.typical_price() * bar.volume, v + bar.volume)
        });
        if volume == 0.0 {
            return Evaluation::noop();
        }

        let vwap = price_volume / volume;
        let signal = if latest.close > vwap {
            Signal::Buy
        } else if latest.close < vwap {
            Signal::Sell
        } else {
            Signal::NoOp
        };

        Evaluation::new(
            signal,
            Analysis::Vwap(VwapAnalysis {
                close: latest.close,
                vwap,
            }),
        )
    }
}
