//! A single mapping rule.

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use strata_core::{
    identifier::Id,
    instance::Instance,
    value::{Map, Value},
};

use crate::{attribute::AttributeDef, error::MappingError, mapping::GroupId};

/// Custom deserialization: reads a document value into the instance.
pub type ReadFn = Arc<dyn Fn(&mut Instance, &Value) -> Result<(), MappingError> + Send + Sync>;

/// Custom serialization: writes any number of fields into the parent map.
pub type WriteFn = Arc<dyn Fn(&Instance, &mut Map) -> Result<(), MappingError> + Send + Sync>;

#[derive(Clone)]
pub(crate) struct CustomMethods {
    pub(crate) read: ReadFn,
    pub(crate) write: WriteFn,
}

/// Maps one document field to an attribute or to custom functions.
#[derive(Clone)]
pub struct MappingRule {
    name: Id,
    to: Option<Id>,
    custom: Option<CustomMethods>,
    delegate: Option<Id>,
    group: Option<GroupId>,
    render_nil: Option<bool>,
}

impl MappingRule {
    pub(crate) fn new(
        name: Id,
        to: Option<Id>,
        custom: Option<CustomMethods>,
        delegate: Option<Id>,
        group: Option<GroupId>,
        render_nil: Option<bool>,
    ) -> Self {
        Self {
            name,
            to,
            custom,
            delegate,
            group,
            render_nil,
        }
    }

    /// A rule mapping the field to the attribute of the same name.
    pub(crate) fn direct(name: Id) -> Self {
        Self::new(name, Some(name), None, None, None, None)
    }

    /// The document field name.
    pub fn name(&self) -> Id {
        self.name
    }

    /// The target attribute, if any.
    pub fn to(&self) -> Option<Id> {
        self.to
    }

    /// Attribute holding the nested instance the target lives on.
    pub fn delegate(&self) -> Option<Id> {
        self.delegate
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Per-rule override for emitting null values.
    pub fn render_nil(&self) -> Option<bool> {
        self.render_nil
    }

    pub fn has_custom_methods(&self) -> bool {
        self.custom.is_some()
    }

    pub(crate) fn custom(&self) -> Option<&CustomMethods> {
        self.custom.as_ref()
    }

    /// Produces this rule's document value.
    ///
    /// With custom methods the write function is invoked against `parent`
    /// and `None` is returned; it may write any fields it likes. Otherwise
    /// the target value is read, through the delegate when one is set, and
    /// [`Value::Null`] stands in for an unset target.
    pub fn serialize(
        &self,
        model: &Instance,
        parent: &mut Map,
    ) -> Result<Option<Value>, MappingError> {
        if let Some(custom) = &self.custom {
            (custom.write)(model, parent)?;
            return Ok(None);
        }

        let source = match self.delegate {
            None => model,
            Some(delegate) => match model.get(delegate) {
                None | Some(Value::Null) => return Ok(Some(Value::Null)),
                Some(Value::Object(inner)) => inner.as_ref(),
                Some(other) => {
                    return Err(MappingError::DelegateValue {
                        delegate,
                        found: other.kind(),
                    });
                }
            },
        };

        let value = self
            .to
            .and_then(|to| source.get(to))
            .cloned()
            .unwrap_or_default();
        Ok(Some(value))
    }

    /// Reads a document value into the instance.
    ///
    /// A missing delegate instance is constructed from the delegate
    /// attribute's model type before the target is set.
    pub fn deserialize(
        &self,
        model: &mut Instance,
        value: &Value,
        attributes: &IndexMap<Id, AttributeDef>,
    ) -> Result<(), MappingError> {
        if let Some(custom) = &self.custom {
            return (custom.read)(model, value);
        }

        let Some(to) = self.to else {
            return Ok(());
        };

        let target = match self.delegate {
            Some(delegate) => delegate_target(model, delegate, attributes)?,
            None => model,
        };
        target.set(to, value.clone());
        Ok(())
    }
}

fn delegate_target<'m>(
    model: &'m mut Instance,
    delegate: Id,
    attributes: &IndexMap<Id, AttributeDef>,
) -> Result<&'m mut Instance, MappingError> {
    let kind = attributes
        .get(&delegate)
        .and_then(|attribute| attribute.kind().model())
        .ok_or(MappingError::DelegateType { delegate })?;

    if model.get(delegate).is_none_or(Value::is_null) {
        model.set(delegate, Instance::new(kind));
    }

    match model.get_mut(delegate) {
        Some(Value::Object(inner)) => Ok(inner.as_mut()),
        other => Err(MappingError::DelegateValue {
            delegate,
            found: other.map_or("nothing", |value| value.kind()),
        }),
    }
}

impl fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("name", &self.name.to_name())
            .field("to", &self.to.map(|id| id.to_name()))
            .field("custom", &self.custom.is_some())
            .field("delegate", &self.delegate.map(|id| id.to_name()))
            .field("group", &self.group)
            .field("render_nil", &self.render_nil)
            .finish()
    }
}
