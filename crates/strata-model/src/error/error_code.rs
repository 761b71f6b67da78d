//! Error codes for the Strata diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Declaration errors, raised while a model is declared
//! - `E2xx` - Content validation failures, reported per instance

use std::fmt;

/// Error codes for categorizing declaration diagnostics and content failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Declaration Errors (E1xx)
    // =========================================================================
    /// Invalid group.
    ///
    /// A group declared a direct attribute, a nested group, an `all`, or
    /// more than one choice.
    E100,

    /// Invalid all.
    ///
    /// An `all` declared a nested particle, or appeared below the top level.
    E101,

    /// Invalid sequence.
    ///
    /// A sequence declared a nested `all`.
    E102,

    /// Invalid choice range.
    ///
    /// A choice bound is not positive, or `min` exceeds `max`.
    E103,

    /// No root mapping.
    ///
    /// `no_root` was declared on a model that is not a group class, or a
    /// group class was used as a document root.
    E104,

    /// Incorrect mapping arguments.
    ///
    /// A mapping rule has neither a target nor a complete custom
    /// read/write pair.
    E105,

    /// Duplicate attribute.
    ///
    /// An attribute with this name was already declared on the model.
    E106,

    /// Unknown attribute.
    ///
    /// A mapping rule targets or delegates through an attribute that was
    /// never declared.
    E107,

    /// Invalid delegate.
    ///
    /// A mapping rule delegates through an attribute that is not declared
    /// with a model type.
    E108,

    /// Invalid occurrence range.
    ///
    /// A collection's minimum occurrence count exceeds its maximum.
    E109,

    // =========================================================================
    // Content Failures (E2xx)
    // =========================================================================
    /// Invalid choice.
    ///
    /// A default-range choice matched zero or several children, or a nested
    /// sequence inside the choice was incomplete.
    E200,

    /// Out of range choice.
    ///
    /// A choice with an explicit range matched a number of children outside
    /// that range.
    E201,

    /// Incorrect sequence.
    ///
    /// Sequence children do not appear in their declared order.
    E202,

    /// Incomplete all.
    ///
    /// A required child of an `all` is missing.
    E203,

    /// Collection count out of range.
    ///
    /// A collection attribute holds fewer or more items than declared.
    E204,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            ErrorCode::E109 => "E109",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "invalid group",
            ErrorCode::E101 => "invalid all",
            ErrorCode::E102 => "invalid sequence",
            ErrorCode::E103 => "invalid choice range",
            ErrorCode::E104 => "no root mapping",
            ErrorCode::E105 => "incorrect mapping arguments",
            ErrorCode::E106 => "duplicate attribute",
            ErrorCode::E107 => "unknown attribute",
            ErrorCode::E108 => "invalid delegate",
            ErrorCode::E109 => "invalid occurrence range",
            ErrorCode::E200 => "invalid choice",
            ErrorCode::E201 => "out of range choice",
            ErrorCode::E202 => "incorrect sequence",
            ErrorCode::E203 => "incomplete all",
            ErrorCode::E204 => "collection count out of range",
        }
    }

    /// Returns `true` for codes raised while a model is declared.
    pub fn is_declaration(&self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
