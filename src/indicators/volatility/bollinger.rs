//! Bollinger Bands indicator

use crate::common::math;
use crate::indicators::{closes, sma};
use crate::models::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    /// upper - lower
    pub width: f64,
}

/// Population standard deviation of the closes around `mean`.
pub fn std_dev(bars: &[Bar], mean: f64) -> f64 {
    math::standard_deviation(&closes(bars), mean)
}

/// Middle = SMA(bars), bands at `k` standard deviations on either side.
pub fn bollinger_bands(bars: &[Bar], k: f64) -> BollingerBands {
    let middle = sma(bars);
    let sigma = std_dev(bars, middle);
    let upper = middle + k * sigma;
    let lower = middle - k * sigma;
    BollingerBands {
        middle,
        upper,
        lower,
        width: upper - lower,
    }
}
