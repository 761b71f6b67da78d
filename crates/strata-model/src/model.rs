//! Declared models.

use indexmap::IndexMap;
use log::debug;

use strata_core::{
    identifier::Id,
    instance::{Instance, Materialized},
    value::Map,
};

use crate::{
    attribute::AttributeDef,
    error::{DeclarationError, Diagnostic, ErrorCode, Failure, MappingError, ValidationError},
    mapping::{Format, Mapping, PassOptions},
    particle::{Particle, ParticleId},
    validate::{ValidateConfig, Walk},
};

/// Whether a declaration is a full model or a reusable group class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Model,
    Group,
}

/// A fully declared model: attributes, content tree and mappings.
///
/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub(crate) name: Id,
    pub(crate) kind: ModelKind,
    pub(crate) attributes: IndexMap<Id, AttributeDef>,
    pub(crate) particles: Vec<Particle>,
    pub(crate) roots: Vec<ParticleId>,
    pub(crate) mappings: IndexMap<Format, Mapping>,
    pub(crate) xml_root: Option<Id>,
    pub(crate) no_root: bool,
}

impl ModelDef {
    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.values()
    }

    pub fn attribute(&self, name: impl Into<Id>) -> Option<&AttributeDef> {
        self.attributes.get(&name.into())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    /// Top-level particles in declaration order.
    pub fn roots(&self) -> &[ParticleId] {
        &self.roots
    }

    pub fn is_no_root(&self) -> bool {
        self.no_root
    }

    /// The mapping used for `format`.
    ///
    /// JSON, YAML and TOML fall back to the shared key-value mapping when
    /// they have none of their own.
    pub fn mapping(&self, format: Format) -> Option<&Mapping> {
        self.mappings.get(&format).or_else(|| match format {
            Format::Json | Format::Yaml | Format::Toml => self.mappings.get(&Format::KeyValue),
            Format::Xml | Format::KeyValue => None,
        })
    }

    /// The element name used when this model is a document root.
    ///
    /// # Errors
    ///
    /// Fails for group classes declared with `no_root`.
    pub fn root_element(&self) -> Result<Id, DeclarationError> {
        if self.no_root {
            return Err(Diagnostic::error(format!(
                "model `{}` declares `no_root` and can't be used as a document root",
                self.name
            ))
            .with_code(ErrorCode::E104)
            .with_model(self.name)
            .into());
        }
        Ok(self.xml_root.unwrap_or(self.name))
    }

    /// An empty instance of this model.
    pub fn new_instance(&self) -> Instance {
        Instance::new(self.name)
    }

    /// Validates `object` with the default configuration.
    pub fn validate(&self, object: &dyn Materialized) -> Vec<Failure> {
        self.validate_with(object, &ValidateConfig::default())
    }

    /// Validates `object`, returning every failure found.
    pub fn validate_with(
        &self,
        object: &dyn Materialized,
        config: &ValidateConfig,
    ) -> Vec<Failure> {
        let failures = Walk::new(self, object, config).run();
        debug!(model:% = self.name, failures = failures.len(); "Validated instance");
        failures
    }

    /// Validates `object`, failing when anything is wrong.
    pub fn validate_strict(&self, object: &dyn Materialized) -> Result<(), ValidationError> {
        self.validate_strict_with(object, &ValidateConfig::default())
    }

    pub fn validate_strict_with(
        &self,
        object: &dyn Materialized,
        config: &ValidateConfig,
    ) -> Result<(), ValidationError> {
        let failures = self.validate_with(object, config);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(failures))
        }
    }

    /// Serializes an instance into a key-value document for `format`.
    ///
    /// Without a declared mapping every attribute maps to a field of the
    /// same name.
    pub fn to_document(
        &self,
        format: Format,
        instance: &Instance,
        options: &PassOptions,
    ) -> Result<Map, MappingError> {
        match self.mapping(format) {
            Some(mapping) => mapping.to_document(instance, options),
            None => Mapping::identity(format, self.attributes()).to_document(instance, options),
        }
    }

    /// Reads a key-value document for `format` into a new instance.
    pub fn from_document(&self, format: Format, doc: &Map) -> Result<Instance, MappingError> {
        let mut instance = self.new_instance();
        match self.mapping(format) {
            Some(mapping) => mapping.from_document(doc, &mut instance, &self.attributes)?,
            None => Mapping::identity(format, self.attributes()).from_document(
                doc,
                &mut instance,
                &self.attributes,
            )?,
        }
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use strata_core::value::Value;

    use super::*;
    use crate::{AttributeType, ModelBuilder};

    #[test]
    fn test_root_element() {
        let plain = ModelBuilder::new("Person").build().unwrap();
        assert_eq!(plain.root_element().unwrap(), "Person");

        let named = ModelBuilder::new("Person").xml_root("person").build().unwrap();
        assert_eq!(named.root_element().unwrap(), "person");

        let group = ModelBuilder::group_class("Fragment").no_root().build().unwrap();
        let err = group.root_element().unwrap_err();
        assert!(err.has_code(ErrorCode::E104));
    }

    #[test]
    fn test_key_value_fallback() {
        let model = ModelBuilder::new("M")
            .attribute("a", AttributeType::String)
            .key_value(|m| {
                m.map("A").to("a");
            })
            .mapping(Format::Yaml, |m| {
                m.map("y").to("a");
            })
            .build()
            .unwrap();

        let field = |format| {
            model
                .mapping(format)
                .and_then(|mapping| mapping.rules().first())
                .map(|rule| rule.name().to_name())
        };
        assert_eq!(field(Format::Json).as_deref(), Some("A"));
        assert_eq!(field(Format::Yaml).as_deref(), Some("y"));
        assert_eq!(field(Format::Xml), None);
    }

    #[test]
    fn test_identity_roundtrip_without_mapping() {
        let model = ModelBuilder::new("M")
            .attribute("a", AttributeType::String)
            .attribute("n", AttributeType::Integer)
            .build()
            .unwrap();

        let instance = model.new_instance().with("a", "x").with("n", 3);
        let doc = model
            .to_document(Format::Json, &instance, &PassOptions::default())
            .unwrap();
        assert_eq!(doc.get("n"), Some(&Value::Integer(3)));

        let back = model.from_document(Format::Json, &doc).unwrap();
        assert_eq!(back, instance);
    }

    #[test]
    fn test_validate_strict() {
        let model = ModelBuilder::new("M")
            .choice(|c| {
                c.attribute("a", AttributeType::String)
                    .attribute("b", AttributeType::String);
            })
            .build()
            .unwrap();

        assert!(model.validate_strict(&model.new_instance().with("a", "1")).is_ok());

        let err = model.validate_strict(&model.new_instance()).unwrap_err();
        assert_eq!(err.failures().len(), 1);
    }
}
