pub mod rsi;

pub use rsi::{rsi, NEUTRAL_RSI};
