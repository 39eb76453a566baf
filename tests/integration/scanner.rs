//! Integration tests for the market scanner

use crate::test_utils::{breakout_series, flat_series, scan_config, MockProvider, Response};
use algoscan::core::{MarketScanner, ScanError};
use algoscan::metrics::Metrics;
use algoscan::models::{OpportunityLevel, RiskLevel, ScanFilters};
use algoscan::output::{NullPrinter, Printer, StringPrinter};
use algoscan::services::market_data::Timeframe;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn scanner_for(
    provider: Arc<MockProvider>,
    universe: &[&str],
    filters: ScanFilters,
    printer: Arc<dyn Printer>,
) -> MarketScanner {
    MarketScanner::new(provider, &scan_config(universe, filters), printer)
        .with_throttle(Duration::ZERO)
}

fn mixed_provider() -> MockProvider {
    MockProvider::new(vec![
        ("AAA", Response::Series(breakout_series(110.0))),
        ("BBB", Response::Fail(500)),
        ("CCC", Response::Series(flat_series())),
        ("DDD", Response::Series(breakout_series(104.0))),
    ])
}

#[tokio::test]
async fn test_failing_symbol_does_not_block_others() {
    let provider = Arc::new(mixed_provider());
    let printer = Arc::new(StringPrinter::new());
    let scanner = scanner_for(
        provider.clone(),
        &["AAA", "BBB", "CCC", "DDD"],
        ScanFilters::permissive(),
        printer.clone(),
    );

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();

    let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "DDD", "CCC"]);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    assert!(printer.contents().contains("Error processing BBB"));
}

#[tokio::test]
async fn test_scores_are_aggregated() {
    let provider = Arc::new(mixed_provider());
    let scanner = scanner_for(
        provider,
        &["AAA", "DDD"],
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    );

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();

    let top = &results[0];
    assert_eq!(top.symbol, "AAA");
    assert_eq!(top.buy_signals, 3);
    assert_eq!(top.weighted_score, 3.0);
    assert_eq!(top.confidence, 1.0);
    assert_eq!(top.last_price, 110.0);
    assert_eq!(top.risk, RiskLevel::Low);
    assert_eq!(top.opportunity, OpportunityLevel::High);
    assert_eq!(
        top.reasoning,
        vec!["Breakout suggests BUY", "VWAP suggests BUY", "Momentum suggests BUY"]
    );

    let second = &results[1];
    assert_eq!(second.symbol, "DDD");
    assert_eq!(second.buy_signals, 2);
    assert_eq!(second.hold_signals, 1);
    assert_eq!(second.opportunity, OpportunityLevel::Medium);
}

#[tokio::test]
async fn test_default_filters_drop_weak_symbols() {
    let provider = Arc::new(mixed_provider());
    let scanner = scanner_for(
        provider,
        &["CCC", "DDD", "AAA"],
        ScanFilters::default(),
        Arc::new(NullPrinter),
    );

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "DDD"]);
}

#[tokio::test]
async fn test_results_sorted_for_any_completion_order() {
    let universe = ["AAA", "CCC", "DDD", "AAA2", "CCC2", "DDD2"];
    let provider = Arc::new(
        MockProvider::new(vec![
            ("AAA", Response::Series(breakout_series(110.0))),
            ("AAA2", Response::Series(breakout_series(112.0))),
            ("CCC", Response::Series(flat_series())),
            ("CCC2", Response::Series(flat_series())),
            ("DDD", Response::Series(breakout_series(104.0))),
            ("DDD2", Response::Series(breakout_series(104.0))),
        ])
        .with_delay(Duration::from_millis(5)),
    );
    let scanner = scanner_for(provider, &universe, ScanFilters::permissive(), Arc::new(NullPrinter))
        .with_max_concurrency(6);

    let first = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    let second = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);

    for pair in first.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.opportunity >= b.opportunity);
        if a.opportunity == b.opportunity {
            assert!(a.weighted_score >= b.weighted_score);
            if a.weighted_score == b.weighted_score {
                assert!(a.confidence >= b.confidence);
            }
        }
    }
    // ties keep universe order
    let ddd: Vec<&str> = first
        .iter()
        .filter(|s| s.symbol.starts_with("DDD"))
        .map(|s| s.symbol.as_str())
        .collect();
    assert_eq!(ddd, vec!["DDD", "DDD2"]);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let universe = ["S1", "S2", "S3", "S4", "S5", "S6", "S7"];
    let provider = Arc::new(
        MockProvider::new(
            universe
                .iter()
                .map(|s| (*s, Response::Series(flat_series())))
                .collect(),
        )
        .with_delay(Duration::from_millis(30)),
    );
    let scanner = scanner_for(
        provider.clone(),
        &universe,
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    )
    .with_max_concurrency(2);

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    assert_eq!(results.len(), 7);
    let peak = provider.peak.load(Ordering::SeqCst);
    assert!(peak <= 2, "peak concurrency {}", peak);
    assert!(peak >= 1);
}

#[tokio::test]
async fn test_empty_series_is_a_failure() {
    let provider = Arc::new(mixed_provider());
    let printer = Arc::new(StringPrinter::new());
    let scanner = scanner_for(
        provider,
        &["AAA", "UNKNOWN"],
        ScanFilters::permissive(),
        printer.clone(),
    );

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(printer.contents().contains("Error processing UNKNOWN: no data returned"));
}

#[tokio::test]
async fn test_every_symbol_failing_is_empty_ok() {
    let provider = Arc::new(MockProvider::new(vec![
        ("X", Response::Fail(500)),
        ("Y", Response::Fail(404)),
    ]));
    let scanner = scanner_for(provider, &["X", "Y"], ScanFilters::permissive(), Arc::new(NullPrinter));

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_panicking_worker_is_excluded() {
    let provider = Arc::new(MockProvider::new(vec![
        ("AAA", Response::Series(breakout_series(110.0))),
        ("BOOM", Response::Panic),
        ("CCC", Response::Series(flat_series())),
    ]));
    let scanner = scanner_for(
        provider,
        &["AAA", "BOOM", "CCC"],
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    );

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "CCC"]);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let provider = Arc::new(mixed_provider());
    let scanner = scanner_for(
        provider.clone(),
        &["AAA", "CCC"],
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = scanner.scan_market(&cancel).await;
    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancelled_mid_scan_returns_promptly() {
    let universe = ["S1", "S2", "S3", "S4", "S5", "S6"];
    let provider = Arc::new(
        MockProvider::new(
            universe
                .iter()
                .map(|s| (*s, Response::Series(flat_series())))
                .collect(),
        )
        .with_delay(Duration::from_secs(5)),
    );
    let scanner = scanner_for(
        provider.clone(),
        &universe,
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    )
    .with_max_concurrency(2);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = scanner.scan_market(&cancel).await;
    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
    // no new tasks once the first two were admitted
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_requests_daily_series_by_default() {
    let provider = Arc::new(mixed_provider());
    let scanner = scanner_for(provider.clone(), &["AAA"], ScanFilters::permissive(), Arc::new(NullPrinter));
    scanner.scan_market(&CancellationToken::new()).await.unwrap();

    let scanner = scanner.with_timeframe(Timeframe::Monthly);
    scanner.scan_market(&CancellationToken::new()).await.unwrap();

    let requested = provider.requested.lock().unwrap().clone();
    assert_eq!(
        requested,
        vec![
            ("AAA".to_string(), Timeframe::Daily),
            ("AAA".to_string(), Timeframe::Monthly)
        ]
    );
}

#[tokio::test]
async fn test_metrics_are_recorded() {
    let provider = Arc::new(mixed_provider());
    let metrics = Metrics::new().unwrap();
    let scanner = scanner_for(
        provider,
        &["AAA", "BBB", "CCC"],
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    )
    .with_metrics(metrics.clone());

    scanner.scan_market(&CancellationToken::new()).await.unwrap();

    assert_eq!(metrics.scan_cycles.get(), 1);
    assert_eq!(metrics.symbols_scanned.get(), 2);
    assert_eq!(metrics.symbols_failed.get(), 1);
    assert!(metrics.render().contains("algoscan_scan_duration_seconds"));
}

#[tokio::test]
async fn test_generate_report() {
    let provider = Arc::new(mixed_provider());
    let printer = Arc::new(StringPrinter::new());
    let scanner = scanner_for(
        provider,
        &["AAA", "CCC", "DDD"],
        ScanFilters::permissive(),
        printer.clone(),
    );
    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    printer.reset();

    scanner.generate_report(&results, 2);
    let report = printer.contents();

    assert!(report.contains("Found 3 stocks matching criteria"));
    assert!(report.contains("1. AAA - 110.000"));
    assert!(report.contains("Signals: BUY 3 | SELL 0 | HOLD 0 | SETUP 0"));
    assert!(report.contains("Confidence: 100.0% | Weighted score: 3.00"));
    assert!(report.contains("Risk: Low | Opportunity: High"));
    assert!(report.contains("Reason: Breakout suggests BUY"));
    assert!(report.contains("2. DDD"));
    assert!(!report.contains("3. CCC"));
}

#[tokio::test]
async fn test_analyze_stock_and_filter_override() {
    let provider = Arc::new(mixed_provider());
    let scanner = scanner_for(
        provider,
        &["AAA", "DDD"],
        ScanFilters::permissive(),
        Arc::new(NullPrinter),
    );
    assert_eq!(scanner.universe(), ["AAA".to_string(), "DDD".to_string()]);

    let score = scanner.analyze_stock("ZZZ", &breakout_series(110.0));
    assert_eq!(score.symbol, "ZZZ");
    assert_eq!(score.buy_signals, 3);
    assert_eq!(score.volume, 3_000_000.0);

    let strict = ScanFilters {
        min_opportunity: OpportunityLevel::High,
        ..ScanFilters::default()
    };
    let scanner = scanner.with_filters(strict.clone());
    assert_eq!(scanner.filters(), &strict);

    let results = scanner.scan_market(&CancellationToken::new()).await.unwrap();
    let symbols: Vec<&str> = results.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA"]);
}
