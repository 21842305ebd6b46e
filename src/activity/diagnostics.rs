//! Structured diagnostics attached to a report

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    /// Component or upstream source the event relates to
    pub source: String,
    pub message: String,
}

/// Collects diagnostics for one report and mirrors each into `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, level: DiagnosticLevel, source: &str, message: impl Into<String>) {
        let message = message.into();
        match level {
            DiagnosticLevel::Debug => debug!(source, "{message}"),
            DiagnosticLevel::Info => info!(source, "{message}"),
            DiagnosticLevel::Warn => warn!(source, "{message}"),
            DiagnosticLevel::Error => error!(source, "{message}"),
        }
        self.events.push(Diagnostic {
            level,
            source: source.to_string(),
            message,
        });
    }

    pub fn debug(&mut self, source: &str, message: impl Into<String>) {
        self.record(DiagnosticLevel::Debug, source, message);
    }

    pub fn info(&mut self, source: &str, message: impl Into<String>) {
        self.record(DiagnosticLevel::Info, source, message);
    }

    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        self.record(DiagnosticLevel::Warn, source, message);
    }

    pub fn error(&mut self, source: &str, message: impl Into<String>) {
        self.record(DiagnosticLevel::Error, source, message);
    }

    /// First error-level message, if any
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.events
            .iter()
            .find(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Diagnostic> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.info("uploads", "found 3 items");
        diagnostics.error("history", "playlist unavailable");
        diagnostics.error("search", "quota exceeded");

        assert_eq!(diagnostics.events().len(), 3);
        assert_eq!(diagnostics.events()[0].level, DiagnosticLevel::Info);

        let first = diagnostics.first_error().unwrap();
        assert_eq!(first.source, "history");
        assert_eq!(first.message, "playlist unavailable");
    }
}
