//! Materialized model instances.
//!
//! An [`Instance`] is the attribute/value object a format adapter builds from
//! a parsed document (or a caller builds by hand) before validation and
//! mapping run over it.

use indexmap::IndexMap;

use crate::{document::ElementOrder, identifier::Id, value::Value};

/// Read access to a materialized object, as consumed by content validation.
pub trait Materialized {
    /// Current value of the named field, if one was set.
    fn value(&self, name: Id) -> Option<&Value>;

    /// Actual child order, when the source format tracks it.
    fn element_order(&self) -> Option<&ElementOrder>;

    /// Returns `true` when the named field holds a present value.
    fn is_present(&self, name: Id) -> bool {
        self.value(name).is_some_and(Value::is_present)
    }
}

/// A materialized object of some declared model.
///
/// # Examples
///
/// ```
/// use strata_core::{identifier::Id, instance::Instance, value::Value};
///
/// let person = Instance::new("PersonDetails")
///     .with("email", "john@example.com")
///     .with("phone", "02344");
///
/// assert_eq!(person.model(), "PersonDetails");
/// assert_eq!(person.get("phone"), Some(&Value::from("02344")));
/// assert!(person.get("first_name").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model: Id,
    fields: IndexMap<Id, Value>,
    element_order: Option<ElementOrder>,
}

impl Instance {
    /// Creates an empty instance of the named model.
    pub fn new(model: impl Into<Id>) -> Self {
        Self {
            model: model.into(),
            fields: IndexMap::new(),
            element_order: None,
        }
    }

    /// Sets a field and returns the instance, for building literals.
    pub fn with(mut self, name: impl Into<Id>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Attaches the actual child order recorded by the adapter.
    pub fn with_element_order(mut self, order: ElementOrder) -> Self {
        self.element_order = Some(order);
        self
    }

    /// The model this instance belongs to.
    pub fn model(&self) -> Id {
        self.model
    }

    /// Returns the value of a field.
    pub fn get(&self, name: impl Into<Id>) -> Option<&Value> {
        self.fields.get(&name.into())
    }

    /// Returns the mutable value of a field.
    pub fn get_mut(&mut self, name: impl Into<Id>) -> Option<&mut Value> {
        self.fields.get_mut(&name.into())
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<Id>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Removes a field and returns its previous value.
    pub fn remove(&mut self, name: impl Into<Id>) -> Option<Value> {
        self.fields.shift_remove(&name.into())
    }

    /// Iterates fields in the order they were first set.
    pub fn fields(&self) -> impl Iterator<Item = (Id, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Replaces the recorded child order.
    pub fn set_element_order(&mut self, order: Option<ElementOrder>) {
        self.element_order = order;
    }
}

impl Materialized for Instance {
    fn value(&self, name: Id) -> Option<&Value> {
        self.fields.get(&name)
    }

    fn element_order(&self) -> Option<&ElementOrder> {
        self.element_order.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut instance = Instance::new("ChadState");
        instance.set("selected", true);

        assert_eq!(instance.get("selected"), Some(&Value::Bool(true)));
        assert!(instance.is_present(Id::new("selected")));
        assert!(!instance.is_present(Id::new("dimpled")));
    }

    #[test]
    fn test_null_is_not_present() {
        let instance = Instance::new("ChadState").with("dimpled", Value::Null);
        assert!(!instance.is_present(Id::new("dimpled")));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut instance = Instance::new("M").with("a", 1).with("b", 2).with("c", 3);
        assert_eq!(instance.remove("b"), Some(Value::Integer(2)));

        let names: Vec<String> = instance.fields().map(|(id, _)| id.to_name()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_element_order() {
        let instance = Instance::new("M").with_element_order(ElementOrder::from_names(["a", "b"]));
        assert_eq!(instance.element_order().map(ElementOrder::is_empty), Some(false));
        assert!(Instance::new("M").element_order().is_none());
    }

    #[test]
    fn test_equality_ignores_nothing() {
        let left = Instance::new("M").with("a", "x");
        let right = Instance::new("M").with("a", "x");
        let other = Instance::new("N").with("a", "x");

        assert_eq!(left, right);
        assert_ne!(left, other);
    }
}
