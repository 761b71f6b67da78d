//! Sequence validation.
//!
//! A sequence collects the names of its children in declaration order and
//! compares them against the object's actual element order. Nested
//! sequences contribute their names in place; nested choices and groups
//! contribute the names of the leaves they matched.

use std::collections::HashSet;

use log::trace;

use strata_core::identifier::Id;

use crate::{
    error::Failure,
    particle::{Node, Particle},
    validate::{SequenceAnchor, Visit, Walk, unrecorded},
};

pub(crate) fn validate(
    walk: &mut Walk<'_>,
    particle: &Particle,
    tally: &mut Vec<Id>,
    order: Option<&mut Vec<Id>>,
    in_choice: bool,
) -> Visit {
    // A taken branch makes every choice inside it required.
    let in_choice = in_choice && !walk.is_taken(Node::Particle(particle.id()));

    let failures = match order {
        // Flattened into the enclosing sequence, which owns the check.
        Some(enclosing) => visit_children(walk, particle, tally, enclosing, in_choice),
        None => {
            let mut declared = Vec::new();
            let mut failures = visit_children(walk, particle, tally, &mut declared, in_choice);
            failures.extend(check_order(walk, &declared));
            failures
        }
    };
    unrecorded(failures)
}

fn visit_children(
    walk: &mut Walk<'_>,
    particle: &Particle,
    tally: &mut Vec<Id>,
    declared: &mut Vec<Id>,
    in_choice: bool,
) -> Vec<Failure> {
    let mut failures = Vec::new();
    for &child in particle.children() {
        if let Err(mut nested) = walk.node(child, tally, Some(&mut *declared), in_choice) {
            failures.append(&mut nested);
        }
    }
    failures
}

/// Compares the declared order with the object's element order.
///
/// Only element names that belong to this sequence take part. Optional
/// children that are absent from the document are dropped from the declared
/// order. Consecutive repeats of a collection are consumed together.
fn check_order(walk: &Walk<'_>, declared: &[Id]) -> Option<Failure> {
    let Some(element_order) = walk.object().element_order() else {
        return None;
    };

    let members: HashSet<Id> = declared.iter().copied().collect();
    let actual: Vec<Id> = element_order
        .elements()
        .filter(|name| members.contains(name))
        .collect();

    let expected: Vec<Id> = declared
        .iter()
        .copied()
        .filter(|name| {
            actual.contains(name)
                || !walk
                    .attribute(*name)
                    .is_some_and(|attribute| attribute.occurs().is_optional())
        })
        .collect();

    let Some(&anchor) = expected.first() else {
        return None;
    };

    let Some(start) = actual.iter().position(|name| *name == anchor) else {
        return match walk.config().sequence_anchor() {
            SequenceAnchor::Lenient => {
                trace!(anchor:% = anchor; "Sequence anchor missing, skipping order check");
                None
            }
            SequenceAnchor::Strict => Some(Failure::IncorrectSequence {
                expected: anchor,
                found: actual.first().copied(),
            }),
        };
    };

    let mut remaining = actual[start..].iter().copied().peekable();
    for name in expected {
        match remaining.next() {
            Some(found) if found == name => {
                if walk.attribute(name).is_some_and(|a| a.is_collection()) {
                    while remaining.next_if_eq(&name).is_some() {}
                }
            }
            found => {
                return Some(Failure::IncorrectSequence {
                    expected: name,
                    found,
                });
            }
        }
    }

    None
}
