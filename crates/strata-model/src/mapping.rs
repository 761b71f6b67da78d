//! Mapping rules between model attributes and document fields.
//!
//! A model declares one [`Mapping`] per serialization [`Format`]. Each
//! mapping is an ordered list of [`MappingRule`]s; a rule either targets an
//! attribute (optionally through a delegate) or carries a custom read/write
//! pair. Rules declared inside a mapping group share one read/write pair
//! that runs once per group, driven by a [`GroupCollector`].
//!
//! Format adapters are outside this crate. Key-value passes operate on a
//! [`Map`](strata_core::value::Map) document, which JSON, YAML and TOML
//! adapters (de)serialize directly.

mod builder;
mod group;
mod key_value;
mod rule;

use std::fmt;

use strata_core::identifier::Id;

use crate::attribute::AttributeDef;

pub use builder::{GroupBuilder, MappingBuilder, RuleBuilder};
pub use group::{GroupCollector, GroupId};
pub use key_value::as_document;
pub use rule::{MappingRule, ReadFn, WriteFn};

/// A serialization format a mapping can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Xml,
    Json,
    Yaml,
    Toml,
    /// Shared by every key-value format without a mapping of its own.
    KeyValue,
}

impl Format {
    /// Returns `true` for formats handled by key-value passes.
    pub fn is_key_value(&self) -> bool {
        !matches!(self, Format::Xml)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::KeyValue => "key_value",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Options for a serialization pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// Emit null values for rules that don't decide for themselves.
    pub render_nil: bool,
}

/// The ordered mapping rules of one format.
#[derive(Debug, Clone)]
pub struct Mapping {
    format: Format,
    rules: Vec<MappingRule>,
}

impl Mapping {
    pub(crate) fn new(format: Format) -> Self {
        Self {
            format,
            rules: Vec::new(),
        }
    }

    /// One rule per attribute, each mapping a field to the attribute of the
    /// same name. Used when a model declares no mapping for a format.
    pub(crate) fn identity<'a>(
        format: Format,
        attributes: impl Iterator<Item = &'a AttributeDef>,
    ) -> Self {
        Self {
            format,
            rules: attributes
                .map(|attribute| MappingRule::direct(attribute.name()))
                .collect(),
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Finds the rule for a document field.
    pub fn rule(&self, name: impl Into<Id>) -> Option<&MappingRule> {
        let name = name.into();
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub(crate) fn extend(&mut self, rules: Vec<MappingRule>) {
        self.rules.extend(rules);
    }
}
