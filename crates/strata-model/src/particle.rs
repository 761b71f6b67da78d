//! Content-model particles.
//!
//! A model's content tree is stored as an arena of [`Particle`]s indexed by
//! [`ParticleId`]. Each particle lists its children in declaration order and
//! remembers its parent, so validation can walk down from the roots and
//! each particle can tell whether it is nested.
//!
//! The per-kind validation rules live in the submodules:
//!
//! - [`sequence`]: children must appear in declared order
//! - [`choice`]: a bounded number of children must be present
//! - [`group`]: a reusable, transparent wrapper
//! - [`all`]: every required child must be present, in any order

pub(crate) mod all;
pub(crate) mod choice;
pub(crate) mod group;
pub(crate) mod sequence;

use std::fmt;

use strata_core::identifier::Id;

/// Index of a particle within its model's particle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleId(usize);

impl ParticleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A child of a particle: either a declared attribute or a nested particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Attribute(Id),
    Particle(ParticleId),
}

/// How many children of a choice must be present.
///
/// A choice declared without a range accepts exactly one child; failures on
/// such a choice are reported as
/// [`Failure::InvalidChoice`](crate::error::Failure::InvalidChoice) rather
/// than as an out-of-range count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceRange {
    min: usize,
    max: usize,
    explicit: bool,
}

impl ChoiceRange {
    /// The implicit `1..=1` range.
    pub const EXACTLY_ONE: ChoiceRange = ChoiceRange {
        min: 1,
        max: 1,
        explicit: false,
    };

    pub(crate) fn explicit(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            explicit: true,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Returns `true` when the range was given at declaration.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl Default for ChoiceRange {
    fn default() -> Self {
        Self::EXACTLY_ONE
    }
}

/// The kind of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Sequence,
    Choice(ChoiceRange),
    Group,
    All,
}

impl ParticleKind {
    /// Lowercase keyword used in diagnostics and logs.
    pub fn keyword(&self) -> &'static str {
        match self {
            ParticleKind::Sequence => "sequence",
            ParticleKind::Choice(_) => "choice",
            ParticleKind::Group => "group",
            ParticleKind::All => "all",
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleKind::Choice(range) if range.is_explicit() => {
                write!(f, "choice({}..={})", range.min(), range.max())
            }
            kind => write!(f, "{}", kind.keyword()),
        }
    }
}

/// One node of the content tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: ParticleId,
    kind: ParticleKind,
    children: Vec<Node>,
    parent: Option<ParticleId>,
}

impl Particle {
    pub(crate) fn new(id: ParticleId, kind: ParticleKind, parent: Option<ParticleId>) -> Self {
        Self {
            id,
            kind,
            children: Vec::new(),
            parent,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn parent(&self) -> Option<ParticleId> {
        self.parent
    }

    /// Returns `true` for particles declared inside another particle.
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_range_contains() {
        let range = ChoiceRange::explicit(1, 2);
        assert!(!range.contains(0));
        assert!(range.contains(1));
        assert!(range.contains(2));
        assert!(!range.contains(3));
        assert!(range.is_explicit());
        assert!(!ChoiceRange::default().is_explicit());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ParticleKind::Sequence.to_string(), "sequence");
        assert_eq!(ParticleKind::Choice(ChoiceRange::default()).to_string(), "choice");
        assert_eq!(
            ParticleKind::Choice(ChoiceRange::explicit(1, 3)).to_string(),
            "choice(1..=3)"
        );
    }

    #[test]
    fn test_nested_particle() {
        let root = Particle::new(ParticleId::new(0), ParticleKind::Sequence, None);
        let inner = Particle::new(ParticleId::new(1), ParticleKind::Group, Some(root.id()));

        assert!(!root.is_nested());
        assert!(inner.is_nested());
        assert_eq!(inner.parent(), Some(ParticleId::new(0)));
    }
}
