//! Document-shape context supplied by format adapters.
//!
//! Adapters that preserve child order (XML in particular) record the names of
//! a node's children as they were parsed. The content model consults this
//! order to check sequences; adapters without a notion of order simply do not
//! attach one.

use crate::identifier::Id;

/// Marker name adapters use for a text child.
pub const TEXT_MARKER: &str = "text";

/// Marker name adapters use for a CDATA child.
pub const CDATA_MARKER: &str = "cdata";

/// The actual order of child nodes in a parsed document.
///
/// # Examples
///
/// ```
/// use strata_core::document::ElementOrder;
///
/// let order = ElementOrder::from_names(["name", "text", "email"]).with_mixed(true);
/// let names: Vec<String> = order.elements().map(|id| id.to_name()).collect();
///
/// assert_eq!(names, ["name", "email"]);
/// assert!(order.is_mixed());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOrder {
    names: Vec<Id>,
    mixed: bool,
}

impl ElementOrder {
    /// Creates an element order from already interned names.
    pub fn new(names: Vec<Id>) -> Self {
        Self {
            names,
            mixed: false,
        }
    }

    /// Creates an element order from raw names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(names.into_iter().map(|n| Id::new(n.as_ref())).collect())
    }

    /// Marks the document node as mixed content.
    pub fn with_mixed(mut self, mixed: bool) -> Self {
        self.mixed = mixed;
        self
    }

    /// Returns `true` when text and elements are interleaved.
    pub fn is_mixed(&self) -> bool {
        self.mixed
    }

    /// All recorded child names, text markers included.
    pub fn names(&self) -> &[Id] {
        &self.names
    }

    /// Child element names with text and CDATA markers filtered out.
    pub fn elements(&self) -> impl Iterator<Item = Id> + '_ {
        self.names
            .iter()
            .copied()
            .filter(|name| *name != TEXT_MARKER && *name != CDATA_MARKER)
    }

    /// Returns `true` when no child was recorded.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
