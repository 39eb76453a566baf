//! Pure indicator functions over bar series.
//!
//! Every function reads only the bars it is given and never fails: degenerate
//! input yields a neutral value (0, or 50 for RSI).

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use momentum::rsi;
pub use trend::{ema, ema_closes, sma};
pub use volatility::{atr, bollinger_bands, std_dev, BollingerBands};

use crate::models::Bar;

/// The last `n` bars of a series, or the whole series when shorter.
pub fn tail(bars: &[Bar], n: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(n)..]
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
