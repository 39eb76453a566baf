//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::closes;
use crate::models::Bar;

/// EMA line over arbitrary values, one point per input value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    math::ema(values, period)
}

/// EMA line over the closes of the whole series.
pub fn ema_closes(bars: &[Bar], period: usize) -> Vec<f64> {
    math::ema(&closes(bars), period)
}
