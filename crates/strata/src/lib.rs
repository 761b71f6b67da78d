//! Strata - Declarative data models with XML Schema style content validation.
//!
//! Models are declared once with a [`ModelBuilder`], registered with a
//! [`Strata`] registry and then used to validate instances and to map them
//! to and from key-value documents.

pub mod config;

mod error;

pub use strata_core::{document, identifier, instance, value};
pub use strata_model::{
    AttributeDef, AttributeType, Format, ModelBuilder, ModelDef, ModelKind, Occurs,
    ParticleBuilder, SequenceAnchor, error as model_error, mapping, particle,
};

pub use error::StrataError;

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info, trace};

use strata_model::error::Failure;

use config::AppConfig;
use identifier::Id;
use instance::Instance;
use value::Map;

/// Registry of declared models.
///
/// Models are shared as `Arc<ModelDef>`; a registered model is immutable
/// and can be handed to other threads.
///
/// # Examples
///
/// ```
/// use strata::{AttributeType, ModelBuilder, Strata, instance::Instance};
///
/// let mut strata = Strata::default();
/// strata
///     .register(ModelBuilder::new("PersonDetails").choice(|c| {
///         c.attribute("email", AttributeType::String)
///             .attribute("phone", AttributeType::String);
///     }))
///     .expect("Failed to register");
///
/// let person = Instance::new("PersonDetails").with("phone", "02344");
/// assert!(strata.validate(&person).expect("Unknown model").is_empty());
/// ```
#[derive(Default)]
pub struct Strata {
    config: AppConfig,
    models: IndexMap<Id, Arc<ModelDef>>,
}

impl Strata {
    /// Create a new registry with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Validation and mapping settings applied to every call.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            models: IndexMap::new(),
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build a model declaration and register it under its name.
    ///
    /// # Arguments
    ///
    /// * `builder` - The model declaration.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::Declaration` with every structural problem of
    /// the declaration, or `StrataError::DuplicateModel` when a model of the
    /// same name is already registered.
    pub fn register(&mut self, builder: ModelBuilder) -> Result<Arc<ModelDef>, StrataError> {
        let model = builder.build()?;
        let name = model.name();

        if self.models.contains_key(&name) {
            return Err(StrataError::DuplicateModel { model: name });
        }

        info!(model:% = name, kind:? = model.kind(); "Registered model");
        let model = Arc::new(model);
        self.models.insert(name, Arc::clone(&model));
        Ok(model)
    }

    /// Look up a registered model by name.
    pub fn model(&self, name: impl Into<Id>) -> Option<&Arc<ModelDef>> {
        self.models.get(&name.into())
    }

    /// Iterate over registered models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &Arc<ModelDef>> {
        self.models.values()
    }

    /// Validate an instance against the model it names.
    ///
    /// Content failures are returned, not raised; an empty list means the
    /// instance is valid.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::UnknownModel` when the instance's model is not
    /// registered.
    pub fn validate(&self, instance: &Instance) -> Result<Vec<Failure>, StrataError> {
        let model = self.lookup(instance.model())?;
        let config = self.config.validation().to_validate_config();
        Ok(model.validate_with(instance, &config))
    }

    /// Validate an instance, failing when the pass finds any content failure.
    ///
    /// One pass runs to completion; the error carries every failure it found.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::Validation` carrying every failure, or
    /// `StrataError::UnknownModel`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::{AttributeType, ModelBuilder, Strata, StrataError, instance::Instance};
    ///
    /// let mut strata = Strata::default();
    /// strata
    ///     .register(ModelBuilder::new("ChadState").choice_in(1, 3, |c| {
    ///         c.attribute("selected", AttributeType::Boolean)
    ///             .attribute("dimpled", AttributeType::Boolean);
    ///     }))
    ///     .expect("Failed to register");
    ///
    /// let err = strata
    ///     .validate_strict(&Instance::new("ChadState"))
    ///     .expect_err("an empty choice is out of range");
    /// assert!(matches!(err, StrataError::Validation(_)));
    /// ```
    pub fn validate_strict(&self, instance: &Instance) -> Result<(), StrataError> {
        let model = self.lookup(instance.model())?;
        let config = self.config.validation().to_validate_config();
        model.validate_strict_with(instance, &config)?;
        Ok(())
    }

    /// Serialize an instance into a key-value document.
    ///
    /// # Arguments
    ///
    /// * `format` - Selects the mapping block; JSON, YAML and TOML fall back
    ///   to the shared key-value mapping.
    /// * `instance` - The instance to write.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::Mapping` when a custom function or delegate
    /// fails, or `StrataError::UnknownModel`.
    pub fn to_document(&self, format: Format, instance: &Instance) -> Result<Map, StrataError> {
        let model = self.lookup(instance.model())?;
        let options = self.config.mapping().to_pass_options();

        let doc = model.to_document(format, instance, &options)?;
        debug!(
            model:% = model.name(),
            format:% = format,
            fields = doc.len();
            "Serialized instance"
        );
        Ok(doc)
    }

    /// Read a key-value document into a new instance of `model`.
    ///
    /// # Errors
    ///
    /// Returns `StrataError::Mapping` when a custom function or delegate
    /// fails, or `StrataError::UnknownModel`.
    pub fn from_document(
        &self,
        format: Format,
        model: impl Into<Id>,
        doc: &Map,
    ) -> Result<Instance, StrataError> {
        let model = self.lookup(model.into())?;

        let instance = model.from_document(format, doc)?;
        debug!(model:% = model.name(), format:% = format; "Deserialized document");
        trace!(instance:?; "Deserialized instance");
        Ok(instance)
    }

    fn lookup(&self, name: Id) -> Result<&Arc<ModelDef>, StrataError> {
        self.models
            .get(&name)
            .ok_or(StrataError::UnknownModel { model: name })
    }
}
