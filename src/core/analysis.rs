//! Single-symbol technical analysis with an optional advisor opinion.

use crate::core::scanner::{evaluate_ensemble, ScanError};
use crate::models::{RiskLevel, Signal};
use crate::output::{CompositePrinter, Printer, PrinterExt, Span, StringPrinter, Tone};
use crate::services::advisor::Advisor;
use crate::services::market_data::{MarketDataProvider, Timeframe};
use crate::signals::SignalTally;
use crate::strategies::analysis::TechnicalReport;
use crate::strategies::StrategyWeight;
use std::sync::Arc;
use tracing::{info, warn};

/// What one analysis run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub symbol: String,
    pub close: f64,
    pub tally: SignalTally,
    /// Plain text of the printed technical report.
    pub summary: String,
    pub recommendation: Option<String>,
}

pub struct SymbolAnalyzer {
    provider: Arc<dyn MarketDataProvider>,
    strategies: Arc<Vec<StrategyWeight>>,
    printer: Arc<dyn Printer>,
    advisor: Option<Arc<dyn Advisor>>,
    max_risk: RiskLevel,
}

impl SymbolAnalyzer {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        strategies: Vec<StrategyWeight>,
        printer: Arc<dyn Printer>,
    ) -> Self {
        Self {
            provider,
            strategies: Arc::new(strategies),
            printer,
            advisor: None,
            max_risk: RiskLevel::Medium,
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Risk tolerance passed to the advisor.
    pub fn with_max_risk(mut self, max_risk: RiskLevel) -> Self {
        self.max_risk = max_risk;
        self
    }

    pub async fn analyse(&self, symbol: &str, timeframe: Timeframe) -> Result<AnalysisOutcome, ScanError> {
        let series = self
            .provider
            .get_series(symbol, timeframe)
            .await
            .map_err(|source| ScanError::MarketData {
                symbol: symbol.to_string(),
                source,
            })?;
        let Some(last) = series.last() else {
            return Err(ScanError::NoData(symbol.to_string()));
        };
        let close = last.close;

        let evaluations = evaluate_ensemble(&self.strategies, &series);
        let tally = SignalTally::from_evaluations(&self.strategies, &evaluations);

        let capture = Arc::new(StringPrinter::new());
        let report_printer =
            CompositePrinter::new(vec![self.printer.clone(), capture.clone() as Arc<dyn Printer>]);

        report_printer.reset();
        TechnicalReport::new(close, &evaluations).render(&report_printer);
        report_printer.line(format!(
            "Considering {} strategies, the overall sentiment is:",
            tally.total()
        ));
        for signal in Signal::ALL {
            report_printer.write_line(&[
                Span::toned(sentiment_tone(signal), signal.label()),
                Span::plain(format!(":\t{:.0}%", tally.percentage(signal))),
            ]);
        }
        let summary = capture.contents();

        info!(
            symbol,
            %timeframe,
            buy = tally.buy,
            sell = tally.sell,
            "SymbolAnalyzer: analysis complete for {}",
            symbol
        );

        let recommendation = match &self.advisor {
            Some(advisor) => self.consult(advisor.as_ref(), &summary, symbol).await,
            None => None,
        };

        Ok(AnalysisOutcome {
            symbol: symbol.to_string(),
            close,
            tally,
            summary,
            recommendation,
        })
    }

    async fn consult(&self, advisor: &dyn Advisor, summary: &str, symbol: &str) -> Option<String> {
        self.printer.line("======================");
        self.printer.line("Asking the advisor for a recommendation...");

        match advisor
            .advise(summary, &self.max_risk.to_string().to_uppercase(), symbol)
            .await
        {
            Ok(recommendation) => {
                self.printer.line("======================");
                self.printer.line(recommendation.clone());
                Some(recommendation)
            }
            Err(e) => {
                warn!(symbol, error = %e, "SymbolAnalyzer: advisor failed");
                self.printer
                    .colored(Tone::Negative, format!("Advisor unavailable: {}", e));
                None
            }
        }
    }
}

fn sentiment_tone(signal: Signal) -> Tone {
    match signal {
        Signal::Buy => Tone::Positive,
        Signal::Sell => Tone::Negative,
        Signal::Setup => Tone::Caution,
        Signal::NoOp => Tone::Neutral,
    }
}
