pub mod ema;
pub mod sma;

pub use ema::{ema, ema_closes};
pub use sma::sma;
