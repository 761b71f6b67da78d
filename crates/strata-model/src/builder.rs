//! Declaring content models.
//!
//! [`ModelBuilder`] is the entry point. Particles are declared through
//! closures that receive a [`ParticleBuilder`]; structural mistakes are
//! collected as diagnostics while declaration goes on, and
//! [`ModelBuilder::build`] returns them all at once.
//!
//! # Example
//!
//! ```
//! use strata_model::{AttributeType, ModelBuilder};
//!
//! let model = ModelBuilder::new("PersonDetails")
//!     .choice_in(1, 2, |c| {
//!         c.attribute("first_name", AttributeType::String)
//!             .choice_in(2, 2, |inner| {
//!                 inner
//!                     .attribute("email", AttributeType::String)
//!                     .attribute("phone", AttributeType::String);
//!             });
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.attributes().count(), 3);
//! ```

use indexmap::IndexMap;
use log::debug;

use strata_core::identifier::Id;

use crate::{
    ModelDef, ModelKind,
    attribute::{AttributeDef, AttributeType, Occurs},
    error::{DeclarationError, Diagnostic, DiagnosticCollector, ErrorCode},
    mapping::{Format, Mapping, MappingBuilder},
    particle::{ChoiceRange, Node, Particle, ParticleId, ParticleKind},
};

/// Everything declared so far for one model.
struct Declarations {
    model: Id,
    kind: ModelKind,
    attributes: IndexMap<Id, AttributeDef>,
    particles: Vec<Particle>,
    roots: Vec<ParticleId>,
    mappings: IndexMap<Format, Mapping>,
    xml_root: Option<Id>,
    no_root: bool,
    next_group: usize,
    collector: DiagnosticCollector,
}

impl Declarations {
    fn new(model: Id, kind: ModelKind) -> Self {
        Self {
            model,
            kind,
            attributes: IndexMap::new(),
            particles: Vec::new(),
            roots: Vec::new(),
            mappings: IndexMap::new(),
            xml_root: None,
            no_root: false,
            next_group: 0,
            collector: DiagnosticCollector::new(),
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        self.collector.emit(diagnostic.with_model(self.model));
    }

    /// Records an attribute, rejecting duplicates and inverted occurrence
    /// ranges.
    fn declare(&mut self, attribute: AttributeDef) -> bool {
        let name = attribute.name();
        let occurs = attribute.occurs();
        if occurs.max().is_some_and(|max| max < occurs.min()) {
            self.emit(
                Diagnostic::error(format!(
                    "attribute `{name}` declares occurrence range {occurs}, minimum exceeds maximum"
                ))
                .with_code(ErrorCode::E109)
                .with_help("use bounds like `Occurs::bounded(1, 3)`"),
            );
            return false;
        }
        if self.attributes.contains_key(&name) {
            self.emit(
                Diagnostic::error(format!("attribute `{name}` is already declared"))
                    .with_code(ErrorCode::E106),
            );
            return false;
        }
        self.attributes.insert(name, attribute);
        true
    }

    fn choice_range(&mut self, min: i64, max: i64) -> Option<ChoiceRange> {
        match (usize::try_from(min), usize::try_from(max)) {
            (Ok(min @ 1..), Ok(max @ 1..)) if min <= max => Some(ChoiceRange::explicit(min, max)),
            (Ok(1..), Ok(1..)) => {
                self.emit(
                    Diagnostic::error("Choice range must be positive")
                        .with_code(ErrorCode::E103)
                        .with_help(format!("minimum {min} exceeds maximum {max}")),
                );
                None
            }
            _ => {
                self.emit(
                    Diagnostic::error("Choice range must be positive")
                        .with_code(ErrorCode::E103)
                        .with_help("use bounds of at least 1, e.g. `choice_in(1, 2, ..)`"),
                );
                None
            }
        }
    }

    /// Reserves a particle slot before its children are declared.
    fn open(&mut self, kind: ParticleKind, parent: Option<ParticleId>) -> ParticleId {
        let id = ParticleId::new(self.particles.len());
        self.particles.push(Particle::new(id, kind, parent));
        id
    }

    fn close(&mut self, id: ParticleId, children: Vec<Node>) {
        let Some(particle) = self.particles.get_mut(id.index()) else {
            return;
        };
        if children.is_empty() {
            let kind = particle.kind();
            self.emit(Diagnostic::warning(format!("{} declares no children", kind.keyword())));
            return;
        }
        particle.set_children(children);
    }

    /// Declares a particle and runs `f` to fill it.
    fn particle(
        &mut self,
        kind: ParticleKind,
        parent: Option<ParticleId>,
        f: impl FnOnce(&mut ParticleBuilder<'_>),
    ) -> ParticleId {
        let id = self.open(kind, parent);
        let children = {
            let mut builder = ParticleBuilder::new(self, id, kind);
            f(&mut builder);
            builder.children
        };
        self.close(id, children);
        id
    }

    /// Checks that every mapping rule points at something that exists.
    fn check_mappings(&mut self) {
        let mut diagnostics = Vec::new();

        for mapping in self.mappings.values() {
            for rule in mapping.rules() {
                if let Some(delegate) = rule.delegate() {
                    match self.attributes.get(&delegate) {
                        None => diagnostics.push(
                            Diagnostic::error(format!(
                                "mapping '{}' delegates through unknown attribute `{delegate}`",
                                rule.name()
                            ))
                            .with_code(ErrorCode::E107),
                        ),
                        Some(attribute) if attribute.kind().model().is_none() => diagnostics.push(
                            Diagnostic::error(format!(
                                "mapping '{}' delegates through `{delegate}`, which holds a {}",
                                rule.name(),
                                attribute.kind()
                            ))
                            .with_code(ErrorCode::E108)
                            .with_help("delegate attributes must be declared with a model type"),
                        ),
                        Some(_) => {}
                    }
                    continue;
                }

                let unknown_target = rule
                    .to()
                    .filter(|to| !rule.has_custom_methods() && !self.attributes.contains_key(to));
                if let Some(to) = unknown_target {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "mapping '{}' targets unknown attribute `{to}`",
                            rule.name()
                        ))
                        .with_code(ErrorCode::E107),
                    );
                }
            }
        }

        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }
}

/// Declares a model's attributes, content tree and mappings.
pub struct ModelBuilder {
    decl: Declarations,
}

impl ModelBuilder {
    /// Starts declaring a model.
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            decl: Declarations::new(name.into(), ModelKind::Model),
        }
    }

    /// Starts declaring a group class: a reusable content fragment that may
    /// opt out of having a document root.
    pub fn group_class(name: impl Into<Id>) -> Self {
        Self {
            decl: Declarations::new(name.into(), ModelKind::Group),
        }
    }

    /// Declares an attribute outside any particle.
    pub fn attribute(self, name: impl Into<Id>, kind: AttributeType) -> Self {
        self.loose(name.into(), kind, Occurs::ONE, false)
    }

    /// Declares a collection outside any particle.
    pub fn collection(self, name: impl Into<Id>, kind: AttributeType, occurs: Occurs) -> Self {
        self.loose(name.into(), kind, occurs, true)
    }

    pub fn sequence(self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> Self {
        self.root(ParticleKind::Sequence, f)
    }

    /// Declares a choice where exactly one child must be present.
    pub fn choice(self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> Self {
        self.root(ParticleKind::Choice(ChoiceRange::EXACTLY_ONE), f)
    }

    /// Declares a choice where between `min` and `max` children must be
    /// present. Both bounds must be positive.
    pub fn choice_in(
        mut self,
        min: i64,
        max: i64,
        f: impl FnOnce(&mut ParticleBuilder<'_>),
    ) -> Self {
        match self.decl.choice_range(min, max) {
            Some(range) => self.root(ParticleKind::Choice(range), f),
            None => self,
        }
    }

    pub fn group(self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> Self {
        self.root(ParticleKind::Group, f)
    }

    pub fn all(self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> Self {
        self.root(ParticleKind::All, f)
    }

    /// Declares mapping rules for a format. Repeated calls for one format
    /// append rules.
    pub fn mapping(mut self, format: Format, f: impl FnOnce(&mut MappingBuilder<'_>)) -> Self {
        let mut builder = MappingBuilder::new(format, &mut self.decl.next_group);
        f(&mut builder);
        let (rules, diagnostics) = builder.finish();

        for diagnostic in diagnostics {
            self.decl.emit(diagnostic);
        }
        self.decl
            .mappings
            .entry(format)
            .or_insert_with(|| Mapping::new(format))
            .extend(rules);
        self
    }

    /// Declares rules shared by every key-value format.
    pub fn key_value(self, f: impl FnOnce(&mut MappingBuilder<'_>)) -> Self {
        self.mapping(Format::KeyValue, f)
    }

    /// Names the root element used when the model is a document root.
    pub fn xml_root(mut self, name: impl Into<Id>) -> Self {
        self.decl.xml_root = Some(name.into());
        self
    }

    /// Marks the model as never being a document root. Only group classes
    /// may do this.
    pub fn no_root(mut self) -> Self {
        if self.decl.kind != ModelKind::Group {
            self.decl.emit(
                Diagnostic::error("`no_root` is only allowed for Group classes")
                    .with_code(ErrorCode::E104)
                    .with_help("declare the model with `ModelBuilder::group_class`"),
            );
            return self;
        }
        self.decl.no_root = true;
        self
    }

    /// Finishes declaration.
    ///
    /// # Errors
    ///
    /// Returns every error diagnostic collected while the model was declared.
    /// Warnings are logged and do not fail the build.
    pub fn build(mut self) -> Result<ModelDef, DeclarationError> {
        self.decl.check_mappings();

        let Declarations {
            model,
            kind,
            attributes,
            particles,
            roots,
            mappings,
            xml_root,
            no_root,
            collector,
            ..
        } = self.decl;

        collector.finish()?;

        debug!(
            model:% = model,
            attributes = attributes.len(),
            particles = particles.len(),
            mappings = mappings.len();
            "Model declared"
        );

        Ok(ModelDef {
            name: model,
            kind,
            attributes,
            particles,
            roots,
            mappings,
            xml_root,
            no_root,
        })
    }

    fn loose(mut self, name: Id, kind: AttributeType, occurs: Occurs, collection: bool) -> Self {
        self.decl
            .declare(AttributeDef::new(name, kind, occurs, collection, None));
        self
    }

    fn root(mut self, kind: ParticleKind, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> Self {
        let id = self.decl.particle(kind, None, f);
        self.decl.roots.push(id);
        self
    }
}

/// What a particle is asked to hold.
#[derive(Clone, Copy)]
enum Child {
    Attribute,
    Particle(ParticleKind),
}

/// Declares the children of one particle.
pub struct ParticleBuilder<'a> {
    decl: &'a mut Declarations,
    id: ParticleId,
    kind: ParticleKind,
    children: Vec<Node>,
    choices: usize,
}

impl<'a> ParticleBuilder<'a> {
    fn new(decl: &'a mut Declarations, id: ParticleId, kind: ParticleKind) -> Self {
        Self {
            decl,
            id,
            kind,
            children: Vec::new(),
            choices: 0,
        }
    }

    /// Declares a required scalar attribute.
    pub fn attribute(&mut self, name: impl Into<Id>, kind: AttributeType) -> &mut Self {
        self.leaf(name.into(), kind, Occurs::ONE, false)
    }

    /// Declares a scalar attribute that may be left out.
    pub fn optional(&mut self, name: impl Into<Id>, kind: AttributeType) -> &mut Self {
        self.leaf(name.into(), kind, Occurs::OPTIONAL, false)
    }

    pub fn collection(
        &mut self,
        name: impl Into<Id>,
        kind: AttributeType,
        occurs: Occurs,
    ) -> &mut Self {
        self.leaf(name.into(), kind, occurs, true)
    }

    pub fn sequence(&mut self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> &mut Self {
        self.nested(ParticleKind::Sequence, f)
    }

    pub fn choice(&mut self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> &mut Self {
        self.nested(ParticleKind::Choice(ChoiceRange::EXACTLY_ONE), f)
    }

    pub fn choice_in(
        &mut self,
        min: i64,
        max: i64,
        f: impl FnOnce(&mut ParticleBuilder<'_>),
    ) -> &mut Self {
        match self.decl.choice_range(min, max) {
            Some(range) => self.nested(ParticleKind::Choice(range), f),
            None => self,
        }
    }

    pub fn group(&mut self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> &mut Self {
        self.nested(ParticleKind::Group, f)
    }

    pub fn all(&mut self, f: impl FnOnce(&mut ParticleBuilder<'_>)) -> &mut Self {
        self.nested(ParticleKind::All, f)
    }

    fn leaf(
        &mut self,
        name: Id,
        kind: AttributeType,
        occurs: Occurs,
        collection: bool,
    ) -> &mut Self {
        if !self.admit(Child::Attribute) {
            return self;
        }
        let attribute = AttributeDef::new(name, kind, occurs, collection, Some(self.id));
        if self.decl.declare(attribute) {
            self.children.push(Node::Attribute(name));
        }
        self
    }

    fn nested(
        &mut self,
        kind: ParticleKind,
        f: impl FnOnce(&mut ParticleBuilder<'_>),
    ) -> &mut Self {
        if !self.admit(Child::Particle(kind)) {
            return self;
        }
        let id = self.decl.particle(kind, Some(self.id), f);
        self.children.push(Node::Particle(id));
        self
    }

    /// Applies the nesting rules of this particle's kind, emitting a
    /// diagnostic when `child` is not allowed here.
    fn admit(&mut self, child: Child) -> bool {
        use ParticleKind::{All, Choice, Group, Sequence};

        let rejection = match (self.kind, child) {
            (Group, Child::Attribute) => {
                Some((ErrorCode::E100, "Attributes can't be defined directly in group"))
            }
            (Group, Child::Particle(Group)) => {
                Some((ErrorCode::E100, "Nested group definitions are not allowed"))
            }
            (Group, Child::Particle(All)) => Some((ErrorCode::E100, "Can't define all in group")),
            (Group, Child::Particle(Choice(_))) if self.choices > 0 => {
                Some((ErrorCode::E100, "Can't define multiple choices in group"))
            }
            (All, Child::Particle(Group)) => Some((ErrorCode::E101, "Can't define group in all")),
            (All, Child::Particle(All)) => {
                Some((ErrorCode::E101, "Nested all definitions are not allowed"))
            }
            (All, Child::Particle(Choice(_))) => {
                Some((ErrorCode::E101, "Can't define choice in all"))
            }
            (All, Child::Particle(Sequence)) => {
                Some((ErrorCode::E101, "Can't define sequence in all"))
            }
            (Sequence, Child::Particle(All)) => {
                Some((ErrorCode::E102, "Can't define all in sequence"))
            }
            (Choice(_), Child::Particle(All)) => {
                Some((ErrorCode::E101, "all can only be declared at the top level of a model"))
            }
            _ => None,
        };

        if let Some((code, message)) = rejection {
            self.decl.emit(Diagnostic::error(message).with_code(code));
            return false;
        }
        if let Child::Particle(Choice(_)) = child {
            self.choices += 1;
        }
        true
    }
}
