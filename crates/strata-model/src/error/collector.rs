//! Collector for accumulating diagnostics while a model is declared.
//!
//! Declaration continues past the first problem so that every structural
//! mistake in a model is reported at once.

use log::log;

use crate::error::{DeclarationError, Diagnostic};

/// Accumulates declaration diagnostics for one model.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` once any error was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// Returns `Err(DeclarationError)` with every diagnostic when an error
    /// was emitted. Warnings alone are logged and then dropped.
    pub fn finish(self) -> Result<(), DeclarationError> {
        if self.has_errors {
            return Err(DeclarationError::new(self.diagnostics));
        }

        for diagnostic in &self.diagnostics {
            let model = diagnostic.model().map(|id| id.to_name());
            log!(
                diagnostic.severity().log_level(),
                model:?,
                code:? = diagnostic.code();
                "{}",
                diagnostic.message()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_emit_warning_finish_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("sequence declares no children"));

        assert!(!collector.has_errors());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_every_diagnostic() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("error 1").with_code(ErrorCode::E100));
        collector.emit(Diagnostic::warning("warning 1"));
        collector.emit(Diagnostic::error("error 2").with_code(ErrorCode::E103));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.diagnostics()[0].message(), "error 1");
        assert!(err.has_code(ErrorCode::E103));
    }
}
