//! The aggregate error raised by strict validation.

use std::fmt;

use crate::error::Failure;

/// Every failure found in one strict validation call.
///
/// Its message concatenates each failure's description, one per line.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    failures: Vec<Failure>,
}

impl ValidationError {
    /// Wraps a non-empty list of failures.
    pub fn new(failures: Vec<Failure>) -> Self {
        Self { failures }
    }

    /// The collected failures, in walk order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// The description of each failure.
    pub fn messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    /// Consumes the error and returns the failures.
    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationError {}
