//! Prometheus counters for scan activity.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub scan_cycles: IntCounter,
    pub symbols_scanned: IntCounter,
    pub symbols_failed: IntCounter,
    pub scan_duration: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scan_cycles = IntCounter::new("algoscan_scan_cycles_total", "Completed scan cycles")?;
        let symbols_scanned = IntCounter::new(
            "algoscan_symbols_scanned_total",
            "Symbols evaluated successfully",
        )?;
        let symbols_failed = IntCounter::new(
            "algoscan_symbols_failed_total",
            "Symbols excluded because retrieval or evaluation failed",
        )?;
        let scan_duration = Histogram::with_opts(HistogramOpts::new(
            "algoscan_scan_duration_seconds",
            "Wall time of a full scan cycle",
        ))?;

        registry.register(Box::new(scan_cycles.clone()))?;
        registry.register(Box::new(symbols_scanned.clone()))?;
        registry.register(Box::new(symbols_failed.clone()))?;
        registry.register(Box::new(scan_duration.clone()))?;

        Ok(Self {
            registry,
            scan_cycles,
            symbols_scanned,
            symbols_failed,
            scan_duration,
        })
    }

    /// Text exposition format of every registered metric.
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
