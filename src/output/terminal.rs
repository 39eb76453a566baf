use super::{Printer, Span, Tone};
use console::{Style, Term};

/// Prints to stdout, coloring spans by tone when the terminal supports it.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrinter {
    clear_on_reset: bool,
}

impl TerminalPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the screen on [`Printer::reset`], for refreshing dashboards.
    pub fn with_clear_on_reset(mut self, clear: bool) -> Self {
        self.clear_on_reset = clear;
        self
    }

    fn style(tone: Tone) -> Style {
        match tone {
            Tone::Neutral => Style::new(),
            Tone::Positive => Style::new().green(),
            Tone::Negative => Style::new().red(),
            Tone::Caution => Style::new().yellow(),
        }
    }
}

impl Printer for TerminalPrinter {
    fn write_line(&self, spans: &[Span]) {
        let line: String = spans
            .iter()
            .map(|span| Self::style(span.tone).apply_to(&span.text).to_string())
            .collect();
        println!("{}", line);
    }

    fn reset(&self) {
        if self.clear_on_reset {
            let _ = Term::stdout().clear_screen();
        }
    }
}
