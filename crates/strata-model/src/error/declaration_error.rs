//! The error returned when a model declaration is rejected.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// Every diagnostic emitted while declaring one model.
///
/// Produced by [`crate::ModelBuilder::build`]. At least one diagnostic has
/// error severity.
#[derive(Debug)]
pub struct DeclarationError {
    diagnostics: Vec<Diagnostic>,
}

impl DeclarationError {
    /// Create a new declaration error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate the error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
    }

    /// Returns `true` if any diagnostic carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|diag| diag.code() == Some(code))
    }
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.errors();
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
            let rest = errors.count();
            if rest > 0 {
                write!(f, " (+{} more)", rest)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DeclarationError {}

impl From<Diagnostic> for DeclarationError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_diagnostic() {
        let err: DeclarationError = Diagnostic::error("test error")
            .with_code(ErrorCode::E101)
            .into();

        assert_eq!(err.diagnostics().len(), 1);
        assert!(err.has_code(ErrorCode::E101));
        assert!(!err.has_code(ErrorCode::E100));
    }

    #[test]
    fn test_display_single() {
        let err: DeclarationError = Diagnostic::error("Choice range must be positive")
            .with_code(ErrorCode::E103)
            .into();

        assert_eq!(err.to_string(), "error[E103]: Choice range must be positive");
    }

    #[test]
    fn test_display_counts_errors_only() {
        let err = DeclarationError::new(vec![
            Diagnostic::warning("choice declares no children"),
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
        ]);

        assert_eq!(err.to_string(), "error: first error (+1 more)");
        assert_eq!(err.errors().count(), 2);
    }
}
