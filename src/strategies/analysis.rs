//! Human-readable "key technical signals" narrative built from the analysis
//! snapshots of one evaluation run.

use super::{
    Analysis, BollingerAnalysis, BreakoutAnalysis, Evaluation, MacdAnalysis,
    MeanReversionAnalysis, MomentumAnalysis, VwapAnalysis,
};
use crate::output::{Printer, PrinterExt, Span, Tone};

const BAND_PROXIMITY: f64 = 0.01;
const LOW_VOLATILITY_WIDTH: f64 = 0.035;
const LOW_VOLATILITY_ATR: f64 = 0.02;

/// Snapshots collected from one run of the ensemble over one series.
#[derive(Debug, Clone, Default)]
pub struct TechnicalReport {
    pub close: f64,
    pub vwap: Option<VwapAnalysis>,
    pub mean_reversion: Option<MeanReversionAnalysis>,
    pub breakout: Option<BreakoutAnalysis>,
    pub bollinger: Option<BollingerAnalysis>,
    pub macd: Option<MacdAnalysis>,
    pub momentum: Option<MomentumAnalysis>,
}

impl TechnicalReport {
    /// Keeps the last snapshot of each kind.
    pub fn new<'a>(close: f64, evaluations: impl IntoIterator<Item = &'a Evaluation>) -> Self {
        let mut report = Self {
            close,
            ..Self::default()
        };
        for analysis in evaluations.into_iter().filter_map(|e| e.analysis.as_ref()) {
            match analysis {
                Analysis::Vwap(a) => report.vwap = Some(a.clone()),
                Analysis::MeanReversion(a) => report.mean_reversion = Some(a.clone()),
                Analysis::Breakout(a) => report.breakout = Some(a.clone()),
                Analysis::Bollinger(a) => report.bollinger = Some(a.clone()),
                Analysis::Macd(a) => report.macd = Some(a.clone()),
                Analysis::Momentum(a) => report.momentum = Some(a.clone()),
            }
        }
        report
    }

    pub fn render(&self, printer: &dyn Printer) {
        let close = self.close;
        printer.line("Key Technical Signals:");
        printer.line("======================");

        if let Some(v) = &self.vwap {
            printer.line(format!(
                "- Latest Close ({:.3}) is {} VWAP ({:.3})",
                close,
                compare(close, v.vwap),
                v.vwap
            ));
            let (tone, text) = close_over_vwap(close, v.vwap);
            interpretation(printer, tone, text);
        }

        if let Some(mr) = &self.mean_reversion {
            printer.line(format!(
                "- Latest Close ({:.3}) is {} SMA ({:.3})",
                close,
                compare(close, mr.sma),
                mr.sma
            ));
            let (tone, text) = close_over_sma(close, mr.sma);
            interpretation(printer, tone, text);

            let deviation_pct = mr.deviation * 100.0;
            printer.line(format!("- Deviation from SMA: {:.2}%", deviation_pct));
            interpretation(printer, Tone::Neutral, trend_strength(deviation_pct));
        }

        if let Some(b) = &self.breakout {
            printer.line(format!(
                "- Resistance Level: {:.3}, Support Level: {:.3}",
                b.resistance, b.support
            ));
            printer.line(format!(
                "- Price is currently {} breakout range",
                breakout_status(close, b.support, b.resistance)
            ));
            if b.latest_volume > b.avg_volume {
                printer.line("- Volume is above average");
                interpretation(printer, Tone::Positive, "Validates potential breakout");
            } else {
                printer.line("- Volume is below average");
                interpretation(
                    printer,
                    Tone::Caution,
                    "Watch for confirmation before acting",
                );
            }
        }

        if let Some(mr) = &self.mean_reversion {
            printer.line(format!("- Relative Strength: {:.2}", mr.rsi));
            let (tone, text) = rsi_status(mr.rsi);
            interpretation(printer, tone, text);
        }

        if let Some(bb) = &self.bollinger {
            printer.line(format!(
                "- Bollinger Band SMA: {:.3}, Upper: {:.3}, Lower: {:.3}, Width: {:.3}",
                bb.sma, bb.upper, bb.lower, bb.width
            ));
            let (tone, text) = bollinger_suggestion(close, bb.upper, bb.lower);
            interpretation(printer, tone, text);
        }

        if let Some(b) = &self.breakout {
            printer.line(format!("- ATR: {:.4}", b.atr));
            let width = self.bollinger.as_ref().map(|bb| bb.width);
            interpretation(
                printer,
                Tone::Neutral,
                &format!("Volatility is {}", volatility_status(b.atr, width)),
            );
        }

        if let Some(m) = &self.macd {
            printer.line(format!(
                "- MACD minus signal: {:.4} (previous {:.4}, trigger {:.4})",
                m.delta, m.prev_delta, m.trigger_distance
            ));
        }

        if let Some(m) = &self.momentum {
            printer.line(format!(
                "- Momentum over {} bars: {:.2}%",
                m.lookback,
                m.change * 100.0
            ));
        }

        printer.line("======================");
    }
}

fn interpretation(printer: &dyn Printer, tone: Tone, text: &str) {
    printer.write_line(&[Span::plain("\t-> "), Span::toned(tone, text)]);
}

pub fn compare(a: f64, b: f64) -> &'static str {
    if a > b {
        "above"
    } else if a < b {
        "below"
    } else {
        "equal to"
    }
}

/// `deviation_pct` in percent.
pub fn trend_strength(deviation_pct: f64) -> &'static str {
    if deviation_pct < -2.0 {
        "trend strength: slight weakness"
    } else if deviation_pct > 2.0 {
        "trend strength: slight strength"
    } else {
        "trend strength: near neutral"
    }
}

pub fn breakout_status(price: f64, support: f64, resistance: f64) -> &'static str {
    if price > resistance {
        "above resistance (possible breakout)"
    } else if price < support {
        "below support (possible breakdown)"
    } else {
        "inside"
    }
}

pub fn rsi_status(rsi: f64) -> (Tone, &'static str) {
    if rsi < 30.0 {
        (Tone::Positive, "Oversold (reversal opportunity)")
    } else if rsi > 70.0 {
        (Tone::Negative, "Overbought (sell and take profit)")
    } else {
        (Tone::Neutral, "Neutral (sideway market)")
    }
}

/// Low only when both the band width and the ATR are small. Without band data
/// the ATR alone decides.
pub fn volatility_status(atr: f64, band_width: Option<f64>) -> &'static str {
    let narrow = band_width.map_or(true, |w| w < LOW_VOLATILITY_WIDTH);
    if narrow && atr < LOW_VOLATILITY_ATR {
        "low"
    } else {
        "moderate or high"
    }
}

fn close_over_vwap(close: f64, vwap: f64) -> (Tone, &'static str) {
    if close > vwap {
        (Tone::Positive, "Suggests buyers are in control (BULLISH)")
    } else if close < vwap {
        (
            Tone::Negative,
            "Suggests selling pressure, possibly distribution (BEARISH)",
        )
    } else {
        (Tone::Neutral, "No intraday edge for bulls or bears")
    }
}

fn close_over_sma(close: f64, sma: f64) -> (Tone, &'static str) {
    if close > sma {
        (
            Tone::Positive,
            "Indicates uptrend continuation or strength (support in rising trend)",
        )
    } else if close < sma {
        (
            Tone::Negative,
            "Suggests weakness/downtrend, especially if price breaks down from a key moving average",
        )
    } else {
        (Tone::Neutral, "Trend indecision, can act as a magnet")
    }
}

pub fn bollinger_suggestion(price: f64, upper: f64, lower: f64) -> (Tone, &'static str) {
    if price >= upper || (price - upper).abs() <= upper * BAND_PROXIMITY {
        (
            Tone::Negative,
            "Consider selling (price near or above upper band)",
        )
    } else if price <= lower || (price - lower).abs() <= lower * BAND_PROXIMITY {
        (
            Tone::Positive,
            "Consider buying (price near or below lower band)",
        )
    } else {
        (Tone::Neutral, "Hold (price within bands)")
    }
}
