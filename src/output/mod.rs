//! Output sinks for human-readable reports.
//!
//! A report line is a sequence of [`Span`]s, each tagged with a semantic
//! [`Tone`]. Sinks decide how (or whether) to render tones: the terminal
//! printer colors them, the capturing printer drops them.

pub mod capture;
pub mod composite;
pub mod terminal;

pub use capture::{NullPrinter, StringPrinter};
pub use composite::CompositePrinter;
pub use terminal::TerminalPrinter;

/// Semantic color tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Positive,
    Negative,
    Caution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tone: Tone,
    pub text: String,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(Tone::Neutral, text)
    }

    pub fn toned(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// A destination for report lines. Must be shareable across tasks.
pub trait Printer: Send + Sync {
    fn write_line(&self, spans: &[Span]);

    /// Clear previous output before a fresh report, if the sink supports it.
    fn reset(&self) {}
}

/// Convenience methods for single-tone lines.
pub trait PrinterExt: Printer {
    fn line(&self, text: impl Into<String>) {
        self.write_line(&[Span::plain(text)]);
    }

    fn colored(&self, tone: Tone, text: impl Into<String>) {
        self.write_line(&[Span::toned(tone, text)]);
    }

    fn blank(&self) {
        self.write_line(&[]);
    }
}

impl<P: Printer + ?Sized> PrinterExt for P {}

/// Plain text of a line, tones dropped.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
