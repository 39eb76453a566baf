//! Unit tests for the technical analysis narrative

use algoscan::models::Signal;
use algoscan::output::{StringPrinter, Tone};
use algoscan::strategies::analysis::{
    bollinger_suggestion, breakout_status, compare, rsi_status, trend_strength, volatility_status,
    TechnicalReport,
};
use algoscan::strategies::{
    Analysis, BreakoutAnalysis, Evaluation, MeanReversionAnalysis, VwapAnalysis,
};

#[test]
fn test_compare() {
    assert_eq!(compare(2.0, 1.0), "above");
    assert_eq!(compare(1.0, 2.0), "below");
    assert_eq!(compare(1.0, 1.0), "equal to");
}

#[test]
fn test_trend_strength_boundaries() {
    assert_eq!(trend_strength(-2.5), "trend strength: slight weakness");
    assert_eq!(trend_strength(-2.0), "trend strength: near neutral");
    assert_eq!(trend_strength(2.0), "trend strength: near neutral");
    assert_eq!(trend_strength(2.1), "trend strength: slight strength");
}

#[test]
fn test_breakout_status() {
    assert_eq!(breakout_status(12.0, 8.0, 10.0), "above resistance (possible breakout)");
    assert_eq!(breakout_status(7.0, 8.0, 10.0), "below support (possible breakdown)");
    assert_eq!(breakout_status(9.0, 8.0, 10.0), "inside");
}

#[test]
fn test_rsi_status() {
    assert_eq!(rsi_status(25.0).0, Tone::Positive);
    assert_eq!(rsi_status(75.0).0, Tone::Negative);
    assert_eq!(rsi_status(50.0).0, Tone::Neutral);
    assert_eq!(rsi_status(30.0).0, Tone::Neutral);
}

#[test]
fn test_volatility_status() {
    assert_eq!(volatility_status(0.01, Some(0.02)), "low");
    assert_eq!(volatility_status(0.01, Some(0.05)), "moderate or high");
    assert_eq!(volatility_status(0.5, Some(0.02)), "moderate or high");
    assert_eq!(volatility_status(0.01, None), "low");
}

#[test]
fn test_bollinger_suggestion_proximity() {
    // within 1% of the upper band
    assert_eq!(bollinger_suggestion(99.5, 100.0, 80.0).0, Tone::Negative);
    assert_eq!(bollinger_suggestion(80.5, 100.0, 80.0).0, Tone::Positive);
    assert_eq!(bollinger_suggestion(90.0, 100.0, 80.0).0, Tone::Neutral);
}

#[test]
fn test_report_renders_present_sections_only() {
    let evaluations = vec![
        Evaluation::new(
            Signal::Buy,
            Analysis::Vwap(VwapAnalysis {
                close: 105.0,
                vwap: 100.0,
            }),
        ),
        Evaluation::new(
            Signal::NoOp,
            Analysis::MeanReversion(MeanReversionAnalysis {
                rsi: 25.0,
                deviation: 0.05,
                sma: 100.0,
            }),
        ),
        Evaluation::new(
            Signal::Buy,
            Analysis::Breakout(BreakoutAnalysis {
                atr: 1.5,
                lookback: 10,
                resistance: 104.0,
                support: 95.0,
                latest_volume: 3000.0,
                avg_volume: 1000.0,
            }),
        ),
        Evaluation::noop(),
    ];

    let printer = StringPrinter::new();
    TechnicalReport::new(105.0, &evaluations).render(&printer);
    let text = printer.contents();

    assert!(text.starts_with("Key Technical Signals:\n"));
    assert!(text.contains("- Latest Close (105.000) is above VWAP (100.000)"));
    assert!(text.contains("BULLISH"));
    assert!(text.contains("- Deviation from SMA: 5.00%"));
    assert!(text.contains("trend strength: slight strength"));
    assert!(text.contains("- Resistance Level: 104.000, Support Level: 95.000"));
    assert!(text.contains("above resistance (possible breakout)"));
    assert!(text.contains("- Volume is above average"));
    assert!(text.contains("- Relative Strength: 25.00"));
    assert!(text.contains("Oversold"));
    assert!(text.contains("Volatility is moderate or high"));
    assert!(!text.contains("Bollinger"));
    assert!(!text.contains("MACD"));
    assert!(!text.contains("Momentum"));
}
