use super::{plain_text, Printer, Span};
use std::sync::Mutex;

/// Collects output as plain text, one `\n`-terminated line per call.
#[derive(Debug, Default)]
pub struct StringPrinter {
    buffer: Mutex<String>,
}

impl StringPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return the collected text and start over.
    pub fn take(&self) -> String {
        std::mem::take(
            &mut *self
                .buffer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl Printer for StringPrinter {
    fn write_line(&self, spans: &[Span]) {
        let mut buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buffer.push_str(&plain_text(spans));
        buffer.push('\n');
    }

    fn reset(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPrinter;

impl Printer for NullPrinter {
    fn write_line(&self, _spans: &[Span]) {}
}
