//! Configuration types for Strata validation and mapping passes.
//!
//! All types implement [`serde::Deserialize`] so a configuration can be
//! loaded from TOML or any other serde format. Missing sections and fields
//! fall back to their defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining validation and mapping settings.
//! - [`ValidationConfig`] - Controls how content validation treats sequences.
//! - [`MappingConfig`] - Controls how key-value documents are written.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! # use strata::SequenceAnchor;
//! let config = AppConfig::default();
//! assert_eq!(config.validation().sequence_anchor(), SequenceAnchor::Lenient);
//! assert!(!config.mapping().render_nil());
//! ```

use serde::Deserialize;

use strata_model::{PassOptions, SequenceAnchor, ValidateConfig};

/// Top-level configuration combining validation and mapping settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,

    /// Mapping configuration section.
    #[serde(default)]
    mapping: MappingConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given sections.
    ///
    /// # Arguments
    ///
    /// * `validation` - Content validation settings.
    /// * `mapping` - Key-value mapping settings.
    pub fn new(validation: ValidationConfig, mapping: MappingConfig) -> Self {
        Self {
            validation,
            mapping,
        }
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Returns the mapping configuration.
    pub fn mapping(&self) -> &MappingConfig {
        &self.mapping
    }
}

/// Content validation settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ValidationConfig {
    /// What a sequence does when its first declared element is missing from
    /// the element order.
    #[serde(default)]
    sequence_anchor: SequenceAnchor,
}

impl ValidationConfig {
    pub fn new(sequence_anchor: SequenceAnchor) -> Self {
        Self { sequence_anchor }
    }

    /// Returns the configured [`SequenceAnchor`].
    pub fn sequence_anchor(&self) -> SequenceAnchor {
        self.sequence_anchor
    }

    pub(crate) fn to_validate_config(&self) -> ValidateConfig {
        ValidateConfig::new(self.sequence_anchor)
    }
}

/// Key-value mapping settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MappingConfig {
    /// Write null values as explicit nulls for rules that don't decide
    /// themselves.
    #[serde(default)]
    render_nil: bool,
}

impl MappingConfig {
    pub fn new(render_nil: bool) -> Self {
        Self { render_nil }
    }

    /// Returns `true` when null values are written by default.
    pub fn render_nil(&self) -> bool {
        self.render_nil
    }

    pub(crate) fn to_pass_options(&self) -> PassOptions {
        PassOptions {
            render_nil: self.render_nil,
        }
    }
}
