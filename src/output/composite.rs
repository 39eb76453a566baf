use super::{Printer, Span};
use std::sync::Arc;

/// Forwards every line to all of its printers, in order.
#[derive(Clone, Default)]
pub struct CompositePrinter {
    printers: Vec<Arc<dyn Printer>>,
}

impl CompositePrinter {
    pub fn new(printers: Vec<Arc<dyn Printer>>) -> Self {
        Self { printers }
    }

    pub fn push(&mut self, printer: Arc<dyn Printer>) {
        self.printers.push(printer);
    }
}

impl Printer for CompositePrinter {
    fn write_line(&self, spans: &[Span]) {
        for printer in &self.printers {
            printer.write_line(spans);
        }
    }

    fn reset(&self) {
        for printer in &self.printers {
            printer.reset();
        }
    }
}
