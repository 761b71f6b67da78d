//! Content failures found while validating an instance.

use strata_core::identifier::Id;
use thiserror::Error;

use crate::{attribute::Occurs, error::ErrorCode};

/// A single content-model violation.
///
/// Failures are collected by [`crate::ModelDef::validate`]; none of them
/// stops the walk.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    /// A default-range choice did not match exactly one child, or an
    /// incomplete sequence inside it poisoned the match.
    #[error("Exactly one attribute must be specified in a choice (matched {})", join(.matched))]
    InvalidChoice { matched: Vec<Id> },

    /// A choice with an explicit range matched too few or too many children.
    ///
    /// `count` is the number of matches the range was checked against;
    /// `matched` names the present leaves behind them.
    #[error("Attributes must be in specified range in a choice (matched {count}, expected {min}..={max})")]
    OutOfRangeChoice {
        matched: Vec<Id>,
        count: usize,
        min: usize,
        max: usize,
    },

    /// Sequence children appear out of their declared order.
    #[error(
        "Elements must be present in the specified order (expected `{expected}`, found {})",
        .found.map_or_else(|| "end of content".to_owned(), |id| format!("`{id}`"))
    )]
    IncorrectSequence { expected: Id, found: Option<Id> },

    /// Required children of an `all` are missing.
    #[error("All elements of an all block must be present (missing {})", join(.missing))]
    IncompleteAll { missing: Vec<Id> },

    /// A collection holds a number of items outside its occurrence range.
    #[error("Collection `{attribute}` holds {count} items, expected {occurs}")]
    CollectionCountOutOfRange {
        attribute: Id,
        count: usize,
        occurs: Occurs,
    },
}

impl Failure {
    /// The error code of this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Failure::InvalidChoice { .. } => ErrorCode::E200,
            Failure::OutOfRangeChoice { .. } => ErrorCode::E201,
            Failure::IncorrectSequence { .. } => ErrorCode::E202,
            Failure::IncompleteAll { .. } => ErrorCode::E203,
            Failure::CollectionCountOutOfRange { .. } => ErrorCode::E204,
        }
    }
}

fn join(names: &[Id]) -> String {
    if names.is_empty() {
        return "nothing".to_owned();
    }
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
