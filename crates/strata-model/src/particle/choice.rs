//! Choice validation.

use log::trace;

use strata_core::identifier::Id;

use crate::{
    error::Failure,
    particle::{ChoiceRange, Node, Particle},
    validate::Walk,
};

/// Validates a choice, collecting the names of its matched leaves.
///
/// An attribute child is one match. A nested sequence or group is one match
/// when any of its leaves is present. A nested choice adds its matched
/// leaves flat, so an outer range counts them individually. A choice that
/// matched nothing inside an untaken branch of another choice reports
/// nothing.
pub(crate) fn validate(
    walk: &mut Walk<'_>,
    particle: &Particle,
    range: ChoiceRange,
    matched: &mut Vec<Id>,
    in_choice: bool,
) {
    let mut count = 0;
    let mut sequence_error = false;

    for &child in particle.children() {
        let before = matched.len();
        if let Err(failures) = walk.node(child, matched, None, true) {
            trace!(
                choice:% = particle.id(),
                failures = failures.len();
                "Sequence inside choice failed"
            );
            sequence_error = true;
        }

        let added = matched.len() - before;
        count += match child {
            Node::Particle(id) if !walk.is_choice(id) => usize::from(added > 0),
            _ => added,
        };
    }

    if in_choice && count == 0 {
        return;
    }

    if range.contains(count) {
        if sequence_error {
            walk.report(Failure::InvalidChoice {
                matched: matched.clone(),
            });
        }
        return;
    }

    let failure = if range.is_explicit() {
        Failure::OutOfRangeChoice {
            matched: matched.clone(),
            count,
            min: range.min(),
            max: range.max(),
        }
    } else {
        Failure::InvalidChoice {
            matched: matched.clone(),
        }
    };
    walk.report(failure);
}
