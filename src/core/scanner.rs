//! Bounded-concurrency scan of a symbol universe.
//!
//! Every symbol is fetched and evaluated in its own task. A semaphore gates
//! how many tasks may exist at once; results and failures travel back on two
//! separate channels and are collected once every worker has finished. The
//! final list is filtered and ranked after collection, so the output order
//! does not depend on which worker finished first.

use crate::config::ScanConfig;
use crate::metrics::Metrics;
use crate::models::{Bar, OpportunityLevel, RiskLevel, ScanFilters, Signal, StockScore};
use crate::output::{Printer, PrinterExt, Span, Tone};
use crate::services::market_data::{MarketDataError, MarketDataProvider, Timeframe};
use crate::signals::{filter_results, sort_by_opportunity, SignalTally};
use crate::strategies::{Evaluation, StrategyWeight};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(150);

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan cancelled before completion")]
    Cancelled,
    #[error("market data for {symbol}: {source}")]
    MarketData {
        symbol: String,
        #[source]
        source: MarketDataError,
    },
    #[error("no data available for {0}")]
    NoData(String),
}

/// A symbol excluded from a cycle, and why.
#[derive(Debug, Clone)]
struct SymbolFailure {
    symbol: String,
    reason: String,
}

/// Run every strategy of the ensemble over `series`, in ensemble order.
pub fn evaluate_ensemble(strategies: &[StrategyWeight], series: &[Bar]) -> Vec<Evaluation> {
    strategies
        .iter()
        .map(|entry| entry.strategy.execute(series))
        .collect()
}

pub struct MarketScanner {
    provider: Arc<dyn MarketDataProvider>,
    strategies: Arc<Vec<StrategyWeight>>,
    universe: Arc<Vec<String>>,
    filters: ScanFilters,
    printer: Arc<dyn Printer>,
    max_concurrency: usize,
    throttle: Duration,
    timeframe: Timeframe,
    metrics: Option<Metrics>,
}

impl MarketScanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        config: &ScanConfig,
        printer: Arc<dyn Printer>,
    ) -> Self {
        Self {
            provider,
            strategies: Arc::new(config.strategies.clone()),
            universe: Arc::new(config.universe.clone()),
            filters: config.filters.clone(),
            printer,
            max_concurrency: config.max_concurrency.max(1),
            throttle: DEFAULT_THROTTLE,
            timeframe: Timeframe::Daily,
            metrics: None,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Pause each worker keeps after finishing, while still holding its slot.
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_filters(mut self, filters: ScanFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn filters(&self) -> &ScanFilters {
        &self.filters
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Score one already-fetched, non-empty series.
    pub fn analyze_stock(&self, symbol: &str, series: &[Bar]) -> StockScore {
        score_series(symbol, &self.strategies, series)
    }

    /// Evaluate the whole universe once and return the filtered, ranked scores.
    ///
    /// Per-symbol failures are reported and skipped. The call only fails when
    /// `cancel` fires before every symbol has been collected.
    pub async fn scan_market(&self, cancel: &CancellationToken) -> Result<Vec<StockScore>, ScanError> {
        let started = Instant::now();
        info!(
            symbols = self.universe.len(),
            strategies = self.strategies.len(),
            max_concurrency = self.max_concurrency,
            "MarketScanner: starting scan of {} symbols",
            self.universe.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (score_tx, mut score_rx) = mpsc::unbounded_channel::<(usize, StockScore)>();
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<SymbolFailure>();
        let mut tasks = JoinSet::new();

        for (index, symbol) in self.universe.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(spawned = index, "MarketScanner: cancelled while spawning");
                    tasks.shutdown().await;
                    return Err(ScanError::Cancelled);
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    // the semaphore is never closed
                    Err(_) => break,
                },
            };

            let symbol = symbol.clone();
            let provider = self.provider.clone();
            let strategies = self.strategies.clone();
            let score_tx = score_tx.clone();
            let error_tx = error_tx.clone();
            let timeframe = self.timeframe;
            let throttle = self.throttle;

            tasks.spawn(async move {
                let _permit = permit;
                match provider.get_series(&symbol, timeframe).await {
                    Ok(series) if series.is_empty() => {
                        let _ = error_tx.send(SymbolFailure {
                            symbol,
                            reason: "no data returned".to_string(),
                        });
                    }
                    Ok(series) => {
                        let score = score_series(&symbol, &strategies, &series);
                        let _ = score_tx.send((index, score));
                    }
                    Err(e) => {
                        let _ = error_tx.send(SymbolFailure {
                            symbol,
                            reason: e.to_string(),
                        });
                    }
                }
                tokio::time::sleep(throttle).await;
            });
        }
        drop(score_tx);
        drop(error_tx);

        let mut collected: Vec<(usize, StockScore)> = Vec::with_capacity(self.universe.len());
        let mut failures = 0usize;
        let (mut scores_open, mut errors_open) = (true, true);

        while scores_open || errors_open {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.shutdown().await;
                    let mut discarded = 0usize;
                    while score_rx.try_recv().is_ok() {
                        discarded += 1;
                    }
                    while error_rx.try_recv().is_ok() {}
                    info!(
                        collected = collected.len(),
                        discarded,
                        "MarketScanner: scan cancelled, partial results discarded"
                    );
                    return Err(ScanError::Cancelled);
                }
                received = score_rx.recv(), if scores_open => match received {
                    Some(entry) => {
                        if let Some(metrics) = &self.metrics {
                            metrics.symbols_scanned.inc();
                        }
                        collected.push(entry);
                    }
                    None => scores_open = false,
                },
                received = error_rx.recv(), if errors_open => match received {
                    Some(failure) => {
                        failures += 1;
                        if let Some(metrics) = &self.metrics {
                            metrics.symbols_failed.inc();
                        }
                        warn!(
                            symbol = %failure.symbol,
                            error = %failure.reason,
                            "MarketScanner: skipping {}",
                            failure.symbol
                        );
                        self.printer.colored(
                            Tone::Negative,
                            format!("Error processing {}: {}", failure.symbol, failure.reason),
                        );
                    }
                    None => errors_open = false,
                },
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    failures += 1;
                    if let Some(metrics) = &self.metrics {
                        metrics.symbols_failed.inc();
                    }
                    error!(error = %e, "MarketScanner: worker panicked, symbol excluded");
                }
            }
        }

        if collected.is_empty() && failures > 0 {
            warn!(failures, "MarketScanner: every symbol failed this cycle");
        }

        collected.sort_by_key(|(index, _)| *index);
        let scored = collected.len();
        let mut results = filter_results(
            collected.into_iter().map(|(_, score)| score).collect(),
            &self.filters,
        );
        sort_by_opportunity(&mut results);

        let elapsed = started.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.scan_cycles.inc();
            metrics.scan_duration.observe(elapsed.as_secs_f64());
        }
        info!(
            scored,
            failures,
            matched = results.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "MarketScanner: scan finished, {} of {} symbols matched",
            results.len(),
            self.universe.len()
        );

        Ok(results)
    }

    /// Print the first `top_n` entries of a ranked list.
    pub fn generate_report(&self, scores: &[StockScore], top_n: usize) {
        render_report(self.printer.as_ref(), scores, top_n);
    }
}

fn score_series(symbol: &str, strategies: &[StrategyWeight], series: &[Bar]) -> StockScore {
    let evaluations = evaluate_ensemble(strategies, series);
    let score = SignalTally::from_evaluations(strategies, &evaluations).into_score(symbol, series);
    debug!(
        symbol,
        buy = score.buy_signals,
        sell = score.sell_signals,
        weighted_score = score.weighted_score,
        "MarketScanner: scored {}",
        symbol
    );
    score
}

pub fn risk_tone(risk: RiskLevel) -> Tone {
    match risk {
        RiskLevel::Low => Tone::Positive,
        RiskLevel::Medium => Tone::Caution,
        RiskLevel::High => Tone::Negative,
    }
}

pub fn opportunity_tone(opportunity: OpportunityLevel) -> Tone {
    match opportunity {
        OpportunityLevel::High => Tone::Positive,
        OpportunityLevel::Medium => Tone::Caution,
        OpportunityLevel::Low => Tone::Negative,
    }
}

/// Ranked report: header, count, then one block per entry.
pub fn render_report(printer: &dyn Printer, scores: &[StockScore], top_n: usize) {
    printer.blank();
    printer.line("MARKET SCAN RESULTS");
    printer.line("===================");
    printer.line(format!("Found {} stocks matching criteria", scores.len()));

    if scores.is_empty() {
        printer.colored(Tone::Caution, "No stocks matched the scan filters");
        return;
    }

    for (rank, score) in scores.iter().take(top_n).enumerate() {
        printer.blank();
        printer.write_line(&[
            Span::plain(format!("{}. ", rank + 1)),
            Span::toned(Tone::Positive, score.symbol.clone()),
            Span::plain(format!(" - {:.3}", score.last_price)),
        ]);
        printer.line(format!(
            "   Signals: {} {} | {} {} | {} {} | {} {}",
            Signal::Buy.label(),
            score.buy_signals,
            Signal::Sell.label(),
            score.sell_signals,
            Signal::NoOp.label(),
            score.hold_signals,
            Signal::Setup.label(),
            score.setup_signals
        ));
        printer.line(format!(
            "   Confidence: {:.1}% | Weighted score: {:.2}",
            score.confidence * 100.0,
            score.weighted_score
        ));
        printer.write_line(&[
            Span::plain("   Risk: "),
            Span::toned(risk_tone(score.risk), score.risk.to_string()),
            Span::plain(" | Opportunity: "),
            Span::toned(opportunity_tone(score.opportunity), score.opportunity.to_string()),
        ]);
        printer.line(format!("   Volume: {:.0}", score.volume));
        if let Some(reason) = score.reasoning.first() {
            printer.line(format!("   Reason: {}", reason));
        }
    }
}
