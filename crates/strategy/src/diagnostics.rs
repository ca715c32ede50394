use serde::Serialize;
use tracing::warn;

use crate::error::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A computed RSI value fell outside [0, 100].
    RsiOutOfRange,
    /// Bullish and bearish entries fired on the same candle.
    SignalConflict,
}

/// A non-fatal observation made while analysing a candle window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, kind, message: message.into() }
    }
}

/// Collects diagnostics for one evaluation cycle.
///
/// Every recorded diagnostic is also emitted as a `warn!` event.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(kind = ?diagnostic.kind, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
