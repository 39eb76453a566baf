//! The monitoring callback: scan, keep the latest results, report and alert.

use crate::core::scanner::{MarketScanner, ScanError};
use crate::models::{OpportunityLevel, RiskLevel, StockScore};
use crate::output::{Printer, PrinterExt, Tone};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const WATCHLIST_TOP_N: usize = 5;

pub struct WatchList {
    scanner: Arc<MarketScanner>,
    printer: Arc<dyn Printer>,
    cycles: AtomicU64,
    /// Results tagged with the cycle that produced them.
    latest: RwLock<(u64, Vec<StockScore>)>,
}

impl WatchList {
    pub fn new(scanner: Arc<MarketScanner>, printer: Arc<dyn Printer>) -> Self {
        Self {
            scanner,
            printer,
            cycles: AtomicU64::new(0),
            latest: RwLock::new((0, Vec::new())),
        }
    }

    /// Run one scan cycle and replace the stored results.
    ///
    /// When cycles overlap, a cycle that finishes after a newer one has
    /// already stored its results is returned but neither stored nor reported.
    pub async fn refresh(&self, cancel: &CancellationToken) -> Result<Vec<StockScore>, ScanError> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.printer.reset();
        self.printer.line(format!(
            "[{}] Running market scan...",
            chrono::Local::now().format("%H:%M:%S")
        ));

        let results = self.scanner.scan_market(cancel).await?;
        {
            let mut latest = self.latest.write().await;
            if latest.0 > cycle {
                debug!(cycle, newest = latest.0, "WatchList: discarding stale cycle");
                return Ok(results);
            }
            *latest = (cycle, results.clone());
        }

        if results.is_empty() {
            self.printer.colored(Tone::Caution, "No stocks meet current criteria");
            info!("WatchList: refreshed, nothing matched");
            return Ok(results);
        }

        self.printer
            .line(format!("Found {} opportunities", results.len()));
        self.scanner.generate_report(&results, WATCHLIST_TOP_N);

        let alerts: Vec<&StockScore> = results.iter().filter(|s| is_alert(s)).collect();
        for score in &alerts {
            self.printer.colored(
                Tone::Positive,
                format!(
                    "HIGH OPPORTUNITY ALERT: {} (Score: {:.2}, Confidence: {:.1}%)",
                    score.symbol,
                    score.weighted_score,
                    score.confidence * 100.0
                ),
            );
        }
        info!(
            results = results.len(),
            alerts = alerts.len(),
            "WatchList: refreshed"
        );

        Ok(results)
    }

    /// Clone of the most recent cycle's results.
    pub async fn latest(&self) -> Vec<StockScore> {
        self.latest.read().await.1.clone()
    }
}

/// High opportunity at no more than medium risk.
pub fn is_alert(score: &StockScore) -> bool {
    score.opportunity == OpportunityLevel::High && score.risk <= RiskLevel::Medium
}
