//! Group validation.
//!
//! A group only organizes its children; it adds no rule of its own. Its
//! children are visited as if they were declared in the group's place.

use strata_core::identifier::Id;

use crate::{
    particle::{Node, Particle},
    validate::{Visit, Walk, unrecorded},
};

pub(crate) fn validate(
    walk: &mut Walk<'_>,
    particle: &Particle,
    tally: &mut Vec<Id>,
    mut order: Option<&mut Vec<Id>>,
    in_choice: bool,
) -> Visit {
    let in_choice = in_choice && !walk.is_taken(Node::Particle(particle.id()));

    let mut failures = Vec::new();
    for &child in particle.children() {
        if let Err(mut nested) = walk.node(child, tally, order.as_deref_mut(), in_choice) {
            failures.append(&mut nested);
        }
    }
    unrecorded(failures)
}
