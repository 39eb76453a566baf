use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade signal emitted by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    /// A condition is forming but is not actionable yet.
    Setup,
    /// Hold, or not enough information to decide.
    NoOp,
}

impl Signal {
    pub const ALL: [Signal; 4] = [Signal::Buy, Signal::Sell, Signal::Setup, Signal::NoOp];

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Setup => "SETUP",
            Signal::NoOp => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
