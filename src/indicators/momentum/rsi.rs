//! RSI (Relative Strength Index) indicator

use crate::models::Bar;

pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI over the last `period` close-to-close changes.
///
/// RSI = 100 - (100 / (1 + RS)), RS = total gain / total loss.
/// Returns [`NEUTRAL_RSI`] without enough history or when price did not move.
pub fn rsi(bars: &[Bar], period: usize) -> f64 {
    if period == 0 || bars.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in bars.len() - period..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    if gains + losses == 0.0 {
        return NEUTRAL_RSI;
    }
    if losses == 0.0 {
        return 100.0;
    }

    let rs = gains / losses;
    100.0 - (100.0 / (1.0 + rs))
}
