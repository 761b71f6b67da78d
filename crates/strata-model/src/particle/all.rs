//! All validation: every required child present, in any order.

use strata_core::identifier::Id;

use crate::{
    error::Failure,
    particle::{Node, Particle},
    validate::Walk,
};

pub(crate) fn validate(walk: &mut Walk<'_>, particle: &Particle, tally: &mut Vec<Id>) {
    let mut missing = Vec::new();

    for &child in particle.children() {
        let Node::Attribute(name) = child else {
            // Particles never nest inside an all; the builder rejects them.
            continue;
        };

        let Some(attribute) = walk.attribute(name) else {
            continue;
        };

        if attribute.is_present(walk.object()) {
            tally.push(name);
        } else if !attribute.occurs().is_optional() {
            missing.push(name);
        }
    }

    if !missing.is_empty() {
        walk.report(Failure::IncompleteAll { missing });
    }
}
