//! Errors raised while a mapping pass reads or writes an instance.

use strata_core::identifier::Id;
use thiserror::Error;

/// A failure during serialization or deserialization through mapping rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// A custom read or write function reported a problem.
    #[error("custom mapping for `{field}` failed: {message}")]
    Custom { field: Id, message: String },

    /// A delegate attribute does not reference a model type, so it cannot be
    /// constructed on demand.
    #[error("delegate `{delegate}` is not declared with a model type")]
    DelegateType { delegate: Id },

    /// A delegate attribute holds something other than a nested instance.
    #[error("delegate `{delegate}` holds a {found}, expected an object")]
    DelegateValue { delegate: Id, found: &'static str },

    /// A key-value pass was asked to run a mapping of another format.
    #[error("`{format}` mappings can't be used for key-value documents")]
    NotKeyValue { format: &'static str },

    /// The document handed to a key-value pass is not a map.
    #[error("expected a key-value document, found a {found}")]
    NotADocument { found: &'static str },
}

impl MappingError {
    /// Builds a [`MappingError::Custom`], for use inside custom functions.
    pub fn custom(field: impl Into<Id>, message: impl Into<String>) -> Self {
        Self::Custom {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_message() {
        let err = MappingError::custom("one", "value must be a string");
        assert_eq!(
            err.to_string(),
            "custom mapping for `one` failed: value must be a string"
        );
    }

    #[test]
    fn test_delegate_value_message() {
        let err = MappingError::DelegateValue {
            delegate: Id::new("address"),
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "delegate `address` holds a string, expected an object"
        );
    }
}
