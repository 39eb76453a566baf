//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::Bar;

/// Mean true range over the last `period` bars.
///
/// Each true range needs the previous close, so `period + 1` bars are
/// required; with fewer (or a zero period) the ATR is 0.
pub fn atr(bars: &[Bar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return 0.0;
    }

    let start = bars.len() - period;
    let sum: f64 = (start..bars.len())
        .map(|i| math::true_range(bars[i].high, bars[i].low, bars[i - 1].close))
        .sum();
    sum / period as f64
}
