//! Key-value serialization and deserialization passes.

use indexmap::IndexMap;
use log::trace;

use strata_core::{
    identifier::Id,
    instance::Instance,
    value::{Map, Value},
};

use crate::{
    attribute::AttributeDef,
    error::MappingError,
    mapping::{GroupCollector, GroupId, Mapping, PassOptions},
};

impl Mapping {
    /// Serializes an instance into a key-value document.
    ///
    /// Rules run in declaration order. A mapping group is flushed when the
    /// rule stream leaves its block, so the group's fields land where the
    /// group was declared.
    pub fn to_document(
        &self,
        model: &Instance,
        options: &PassOptions,
    ) -> Result<Map, MappingError> {
        self.ensure_key_value()?;

        let mut doc = Map::new();
        let mut groups = GroupCollector::new();
        let mut open: Option<GroupId> = None;

        for rule in &self.rules {
            if let Some(group) = open.filter(|group| rule.group() != Some(*group)) {
                groups.flush(group, model, &mut doc)?;
                open = None;
            }

            if let Some(group) = rule.group() {
                groups.open(rule);
                open = Some(group);
                continue;
            }

            let Some(value) = rule.serialize(model, &mut doc)? else {
                continue;
            };
            if value.is_null() && !rule.render_nil().unwrap_or(options.render_nil) {
                trace!(field:% = rule.name(); "Skipping nil value");
                continue;
            }
            doc.insert(rule.name().to_name(), value);
        }

        if let Some(group) = open {
            groups.flush(group, model, &mut doc)?;
        }
        Ok(doc)
    }

    /// Reads a key-value document into `model`.
    ///
    /// Ungrouped fields are applied first, then each mapping group's read
    /// function runs once with the fields collected for it. Fields the
    /// mapping doesn't know are ignored.
    pub fn from_document(
        &self,
        doc: &Map,
        model: &mut Instance,
        attributes: &IndexMap<Id, AttributeDef>,
    ) -> Result<(), MappingError> {
        self.ensure_key_value()?;

        let mut groups = GroupCollector::new();
        for rule in &self.rules {
            let Some(value) = doc.get(&rule.name().to_name()) else {
                continue;
            };

            if rule.group().is_some() {
                groups.add(rule, value.clone());
            } else {
                rule.deserialize(model, value, attributes)?;
            }
        }

        groups.apply(model)
    }

    fn ensure_key_value(&self) -> Result<(), MappingError> {
        if self.format.is_key_value() {
            Ok(())
        } else {
            Err(MappingError::NotKeyValue {
                format: self.format.keyword(),
            })
        }
    }
}

/// Views a parsed document value as a key-value document.
pub fn as_document(value: &Value) -> Result<&Map, MappingError> {
    value
        .as_map()
        .ok_or(MappingError::NotADocument { found: value.kind() })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        AttributeType, Occurs,
        mapping::{Format, MappingRule, rule::CustomMethods},
    };

    fn mapping(format: Format, rules: Vec<MappingRule>) -> Mapping {
        let mut mapping = Mapping::new(format);
        mapping.extend(rules);
        mapping
    }

    fn direct(name: &str) -> MappingRule {
        MappingRule::direct(Id::new(name))
    }

    #[test]
    fn test_to_document_skips_nil_by_default() {
        let mapping = mapping(Format::Json, vec![direct("a"), direct("b")]);
        let model = Instance::new("M").with("a", 1);

        let doc = mapping.to_document(&model, &PassOptions::default()).unwrap();
        assert_eq!(doc.len(), 1);

        let doc = mapping
            .to_document(&model, &PassOptions { render_nil: true })
            .unwrap();
        assert_eq!(doc.get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_rule_render_nil_overrides_default() {
        let rule = MappingRule::new(Id::new("b"), Some(Id::new("b")), None, None, None, Some(true));
        let mapping = mapping(Format::Yaml, vec![rule]);

        let doc = mapping
            .to_document(&Instance::new("M"), &PassOptions::default())
            .unwrap();
        assert!(doc.contains_key("b"));
    }

    #[test]
    fn test_group_lands_in_declaration_position() {
        let custom = CustomMethods {
            read: Arc::new(|_: &mut Instance, _: &Value| -> Result<(), MappingError> { Ok(()) }),
            write: Arc::new(|_: &Instance, section: &mut Map| -> Result<(), MappingError> {
                section.insert("g".to_owned(), Value::from(true));
                Ok(())
            }),
        };
        let grouped = |name: &str| {
            MappingRule::new(
                Id::new(name),
                None,
                Some(custom.clone()),
                None,
                Some(GroupId::new(0)),
                None,
            )
        };
        let mapping = mapping(
            Format::Toml,
            vec![direct("first"), grouped("one"), grouped("two"), direct("last")],
        );

        let model = Instance::new("M").with("first", 1).with("last", 2);
        let doc = mapping.to_document(&model, &PassOptions::default()).unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "g", "last"]);
    }

    #[test]
    fn test_from_document_ignores_unknown_fields() {
        let mapping = mapping(Format::KeyValue, vec![direct("a")]);
        let mut doc = Map::new();
        doc.insert("a".to_owned(), Value::from("x"));
        doc.insert("zzz".to_owned(), Value::from("y"));

        let mut model = Instance::new("M");
        let attributes = IndexMap::from([(
            Id::new("a"),
            AttributeDef::new(Id::new("a"), AttributeType::String, Occurs::ONE, false, None),
        )]);
        mapping.from_document(&doc, &mut model, &attributes).unwrap();

        assert_eq!(model.fields().count(), 1);
        assert_eq!(model.get("a"), Some(&Value::from("x")));
    }

    #[test]
    fn test_xml_mapping_is_not_key_value() {
        let mapping = mapping(Format::Xml, vec![direct("a")]);
        let err = mapping
            .to_document(&Instance::new("M"), &PassOptions::default())
            .unwrap_err();
        assert_eq!(err, MappingError::NotKeyValue { format: "xml" });
    }

    #[test]
    fn test_as_document_rejects_scalars() {
        assert!(as_document(&Value::Map(Map::new())).is_ok());
        assert_eq!(
            as_document(&Value::from(3)),
            Err(MappingError::NotADocument { found: "integer" })
        );
    }
}
