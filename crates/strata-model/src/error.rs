//! Error and diagnostic types for the Strata content model.
//!
//! Two families of problems are reported:
//!
//! - **Declaration problems** are found while a model is being declared
//!   (a group holding an attribute, a non-positive choice range, a mapping
//!   without a target). They are accumulated as [`Diagnostic`]s by a
//!   collector and returned together from [`crate::ModelBuilder::build`] as
//!   a [`DeclarationError`]. They are fatal to the model.
//! - **Content failures** are found while validating an instance against a
//!   declared model. They are typed [`Failure`]s, collected without stopping
//!   the walk, and optionally wrapped in a [`ValidationError`].
//!
//! Mapping passes report [`MappingError`].
//!
//! # Example
//!
//! ```
//! # use strata_model::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::error("can't define multiple choices in group")
//!     .with_code(ErrorCode::E100)
//!     .with_help("wrap the alternatives in a single choice");
//!
//! assert_eq!(diag.to_string(), "error[E100]: can't define multiple choices in group");
//! ```

mod collector;
mod declaration_error;
mod diagnostic;
mod error_code;
mod failure;
mod mapping_error;
mod severity;
mod validation_error;

pub(crate) use collector::DiagnosticCollector;

pub use declaration_error::DeclarationError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use failure::Failure;
pub use mapping_error::MappingError;
pub use severity::Severity;
pub use validation_error::ValidationError;
