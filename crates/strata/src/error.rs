//! Error types for Strata operations.
//!
//! This module provides the main error type [`StrataError`] which wraps the
//! declaration, validation and mapping errors of the content model.

use thiserror::Error;

use strata_core::identifier::Id;
use strata_model::error::{DeclarationError, MappingError, ValidationError};

/// The main error type for Strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("{0}")]
    Declaration(#[from] DeclarationError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Model `{model}` is already registered")]
    DuplicateModel { model: Id },

    #[error("Model `{model}` is not registered")]
    UnknownModel { model: Id },
}
