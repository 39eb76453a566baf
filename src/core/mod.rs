//! Core application primitives (scanner, scheduler, monitors)

pub mod analysis;
pub mod scanner;
pub mod scheduler;
pub mod watchlist;

pub use analysis::{AnalysisOutcome, SymbolAnalyzer};
pub use scanner::{MarketScanner, ScanError};
pub use scheduler::{CallbackError, TickCallback, WatchScheduler};
pub use watchlist::WatchList;
