//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::indicators::closes;
use crate::models::Bar;

/// Mean close of `bars`. Callers pass the window they want averaged.
pub fn sma(bars: &[Bar]) -> f64 {
    math::mean(&closes(bars))
}
