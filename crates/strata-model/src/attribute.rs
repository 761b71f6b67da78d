//! Declared attributes: the leaves of a content model.
//!
//! Every attribute records the particle it was declared in, so validation
//! can walk from the particle tree down to concrete values and back.

use std::fmt;

use strata_core::{identifier::Id, instance::Materialized};

use crate::{error::Failure, particle::ParticleId};

/// The declared type of an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Boolean,
    /// A nested instance of another declared model.
    Model(Id),
}

impl AttributeType {
    /// The nested model type, for attributes holding instances.
    pub fn model(&self) -> Option<Id> {
        match self {
            AttributeType::Model(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Integer => write!(f, "integer"),
            AttributeType::Float => write!(f, "float"),
            AttributeType::Boolean => write!(f, "boolean"),
            AttributeType::Model(id) => write!(f, "model `{id}`"),
        }
    }
}

/// An occurrence range, `min..max` with an optional upper bound.
///
/// # Examples
///
/// ```
/// use strata_model::Occurs;
///
/// let occurs = Occurs::bounded(1, 3);
/// assert!(occurs.contains(2));
/// assert!(!occurs.contains(4));
/// assert_eq!(occurs.to_string(), "1..3");
/// assert_eq!(Occurs::at_least(0).to_string(), "0..*");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    min: usize,
    max: Option<usize>,
}

impl Occurs {
    /// Exactly one occurrence; the default for scalar attributes.
    pub const ONE: Occurs = Occurs {
        min: 1,
        max: Some(1),
    };

    /// Zero or one occurrence.
    pub const OPTIONAL: Occurs = Occurs {
        min: 0,
        max: Some(1),
    };

    pub fn bounded(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// The upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Returns `true` when the attribute may be left out entirely.
    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

/// A declared attribute of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    name: Id,
    kind: AttributeType,
    occurs: Occurs,
    collection: bool,
    parent: Option<ParticleId>,
}

impl AttributeDef {
    pub(crate) fn new(
        name: Id,
        kind: AttributeType,
        occurs: Occurs,
        collection: bool,
        parent: Option<ParticleId>,
    ) -> Self {
        Self {
            name,
            kind,
            occurs,
            collection,
            parent,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> AttributeType {
        self.kind
    }

    pub fn occurs(&self) -> Occurs {
        self.occurs
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// The particle this attribute was declared in, `None` for loose
    /// attributes declared at model level.
    pub fn parent(&self) -> Option<ParticleId> {
        self.parent
    }

    /// Returns `true` when the object holds a present value for this
    /// attribute.
    pub fn is_present(&self, object: &dyn Materialized) -> bool {
        object.is_present(self.name)
    }

    /// Adds this attribute to `tally` when the object holds a present value.
    pub(crate) fn validate_count(&self, object: &dyn Materialized, tally: &mut Vec<Id>) {
        if self.is_present(object) {
            tally.push(self.name);
        }
    }

    /// Like [`Self::validate_count`], also recording the declared name into
    /// the enclosing sequence's order when there is one.
    pub(crate) fn validate_content(
        &self,
        object: &dyn Materialized,
        tally: &mut Vec<Id>,
        order: Option<&mut Vec<Id>>,
    ) {
        self.validate_count(object, tally);
        if let Some(order) = order {
            order.push(self.name);
        }
    }

    /// Checks a collection's item count against its occurrence range.
    ///
    /// Scalar attributes never fail here; their presence is judged by the
    /// particle that contains them.
    pub fn validate_occurrences(&self, object: &dyn Materialized) -> Option<Failure> {
        if !self.collection {
            return None;
        }

        let count = object.value(self.name).map_or(0, |value| value.occurrences());
        if self.occurs.contains(count) {
            return None;
        }

        Some(Failure::CollectionCountOutOfRange {
            attribute: self.name,
            count,
            occurs: self.occurs,
        })
    }
}

#[cfg(test)]
mod tests {
    use strata_core::{instance::Instance, value::Value};

    use super::*;

    fn tags(occurs: Occurs) -> AttributeDef {
        AttributeDef::new(Id::new("tags"), AttributeType::String, occurs, true, None)
    }

    #[test]
    fn test_occurs_contains() {
        assert!(Occurs::ONE.contains(1));
        assert!(!Occurs::ONE.contains(0));
        assert!(Occurs::OPTIONAL.contains(0));
        assert!(Occurs::at_least(2).contains(100));
        assert!(!Occurs::at_least(2).contains(1));
    }

    #[test]
    fn test_occurs_display() {
        assert_eq!(Occurs::ONE.to_string(), "1..1");
        assert_eq!(Occurs::at_least(1).to_string(), "1..*");
    }

    #[test]
    fn test_collection_within_range() {
        let object = Instance::new("Post").with("tags", vec!["a", "b"]);
        assert_eq!(tags(Occurs::bounded(1, 3)).validate_occurrences(&object), None);
    }

    #[test]
    fn test_collection_too_many() {
        let object = Instance::new("Post").with("tags", vec!["a", "b", "c", "d"]);
        let failure = tags(Occurs::bounded(1, 3)).validate_occurrences(&object);

        assert_eq!(
            failure.map(|f| f.to_string()),
            Some("Collection `tags` holds 4 items, expected 1..3".to_owned())
        );
    }

    #[test]
    fn test_missing_collection_counts_as_empty() {
        let object = Instance::new("Post");
        assert!(tags(Occurs::at_least(1)).validate_occurrences(&object).is_some());
        assert!(tags(Occurs::at_least(0)).validate_occurrences(&object).is_none());
    }

    #[test]
    fn test_scalar_never_counts() {
        let attr = AttributeDef::new(
            Id::new("name"),
            AttributeType::String,
            Occurs::ONE,
            false,
            None,
        );
        let object = Instance::new("Post").with("name", Value::Null);
        assert!(attr.validate_occurrences(&object).is_none());
        assert!(!attr.is_present(&object));
    }

    #[test]
    fn test_model_type() {
        assert_eq!(AttributeType::Model(Id::new("Address")).model(), Some(Id::new("Address")));
        assert_eq!(AttributeType::Integer.model(), None);
    }
}
