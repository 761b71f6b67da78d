//! Content validation of a materialized object against a declared model.
//!
//! Validation is a single recursive walk over the model's particle tree.
//! Collection counts are checked first, then every root particle is visited.
//! Failures are collected; nothing stops the walk early.

use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

use strata_core::{identifier::Id, instance::Materialized};

use crate::{
    ModelDef,
    attribute::AttributeDef,
    error::Failure,
    particle::{Node, ParticleId, ParticleKind, all, choice, group, sequence},
};

/// What a sequence does when its first declared element is missing from the
/// object's element order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceAnchor {
    /// Skip the order check.
    #[default]
    Lenient,
    /// Report an incorrect sequence.
    Strict,
}

impl FromStr for SequenceAnchor {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err("Unsupported sequence anchor"),
        }
    }
}

/// Options for a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidateConfig {
    sequence_anchor: SequenceAnchor,
}

impl ValidateConfig {
    pub fn new(sequence_anchor: SequenceAnchor) -> Self {
        Self { sequence_anchor }
    }

    pub fn sequence_anchor(&self) -> SequenceAnchor {
        self.sequence_anchor
    }
}

/// Result of visiting a node.
///
/// `Err` carries the sequence-order failures that the enclosing particle has
/// not recorded yet. A choice absorbs them as a poisoned match; at the root
/// each one is reported.
pub(crate) type Visit = Result<(), Vec<Failure>>;

/// Turns collected order failures into a [`Visit`].
pub(crate) fn unrecorded(failures: Vec<Failure>) -> Visit {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

/// State of one validation pass.
pub(crate) struct Walk<'a> {
    model: &'a ModelDef,
    object: &'a dyn Materialized,
    config: &'a ValidateConfig,
    failures: Vec<Failure>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(
        model: &'a ModelDef,
        object: &'a dyn Materialized,
        config: &'a ValidateConfig,
    ) -> Self {
        Self {
            model,
            object,
            config,
            failures: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Vec<Failure> {
        let model = self.model;

        for attribute in model.attributes() {
            if let Some(failure) = attribute.validate_occurrences(self.object) {
                self.report(failure);
            }
        }

        for &root in model.roots() {
            let mut tally = Vec::new();
            if let Err(failures) = self.node(Node::Particle(root), &mut tally, None, false) {
                for failure in failures {
                    self.report(failure);
                }
            }
        }

        self.failures
    }

    pub(crate) fn object(&self) -> &'a dyn Materialized {
        self.object
    }

    pub(crate) fn config(&self) -> &'a ValidateConfig {
        self.config
    }

    pub(crate) fn attribute(&self, name: Id) -> Option<&'a AttributeDef> {
        self.model.attribute(name)
    }

    pub(crate) fn is_choice(&self, id: ParticleId) -> bool {
        self.model
            .particle(id)
            .is_some_and(|particle| matches!(particle.kind(), ParticleKind::Choice(_)))
    }

    /// Returns `true` when any leaf below `node` holds a present value.
    pub(crate) fn is_taken(&self, node: Node) -> bool {
        match node {
            Node::Attribute(name) => self
                .model
                .attribute(name)
                .is_some_and(|attribute| attribute.is_present(self.object)),
            Node::Particle(id) => self.model.particle(id).is_some_and(|particle| {
                particle.children().iter().any(|&child| self.is_taken(child))
            }),
        }
    }

    pub(crate) fn report(&mut self, failure: Failure) {
        trace!(code:? = failure.code(); "{failure}");
        self.failures.push(failure);
    }

    /// Visits one node of the content tree.
    ///
    /// `tally` collects the names of present leaves. `order` is the declared
    /// order of the nearest enclosing sequence, when there is one.
    /// `in_choice` is set below a choice until a branch with a present leaf
    /// is entered; there a choice that matches nothing is an untaken branch.
    pub(crate) fn node(
        &mut self,
        node: Node,
        tally: &mut Vec<Id>,
        order: Option<&mut Vec<Id>>,
        in_choice: bool,
    ) -> Visit {
        let particle_id = match node {
            Node::Attribute(name) => {
                self.leaf(name, tally, order);
                return Ok(());
            }
            Node::Particle(id) => id,
        };

        let model = self.model;
        let Some(particle) = model.particle(particle_id) else {
            return Ok(());
        };

        match particle.kind() {
            ParticleKind::Sequence => sequence::validate(self, particle, tally, order, in_choice),
            ParticleKind::Choice(range) => {
                let mut matched = Vec::new();
                choice::validate(self, particle, range, &mut matched, in_choice);
                if let Some(order) = order {
                    order.extend_from_slice(&matched);
                }
                tally.append(&mut matched);
                Ok(())
            }
            ParticleKind::Group => group::validate(self, particle, tally, order, in_choice),
            ParticleKind::All => {
                all::validate(self, particle, tally);
                Ok(())
            }
        }
    }

    fn leaf(&self, name: Id, tally: &mut Vec<Id>, order: Option<&mut Vec<Id>>) {
        if let Some(attribute) = self.model.attribute(name) {
            attribute.validate_content(self.object, tally, order);
        }
    }
}
