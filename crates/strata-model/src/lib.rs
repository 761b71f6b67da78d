//! Strata Content Model
//!
//! Declares XML-Schema-style content models over plain attribute
//! declarations and validates materialized instances against them.
//!
//! # Overview
//!
//! - **Declaration**: [`ModelBuilder`] records attributes, a tree of
//!   particles (sequence, choice, group, all) and per-format mapping rules.
//!   Structural mistakes are reported together as a
//!   [`DeclarationError`](error::DeclarationError).
//! - **Validation**: [`ModelDef::validate`] walks the particle tree against
//!   an instance and returns every [`Failure`](error::Failure) found.
//! - **Mapping**: [`ModelDef::to_document`] and [`ModelDef::from_document`]
//!   run key-value passes driven by the declared [`mapping`] rules.
//!
//! # Example
//!
//! ```
//! use strata_core::instance::Instance;
//! use strata_model::{AttributeType, ModelBuilder, error::Failure};
//!
//! let model = ModelBuilder::new("ChadState")
//!     .choice_in(1, 3, |c| {
//!         c.attribute("selected", AttributeType::Boolean)
//!             .attribute("unselected", AttributeType::Boolean)
//!             .attribute("dimpled", AttributeType::Boolean)
//!             .attribute("perforated", AttributeType::Boolean);
//!     })
//!     .build()
//!     .unwrap();
//!
//! let ok = Instance::new("ChadState").with("dimpled", false);
//! assert!(model.validate(&ok).is_empty());
//!
//! let failures = model.validate(&Instance::new("ChadState"));
//! assert!(matches!(failures[0], Failure::OutOfRangeChoice { .. }));
//! ```

mod attribute;
mod builder;
pub mod error;
pub mod mapping;
mod model;
pub mod particle;
mod validate;

pub use attribute::{AttributeDef, AttributeType, Occurs};
pub use builder::{ModelBuilder, ParticleBuilder};
pub use mapping::{Format, PassOptions};
pub use model::{ModelDef, ModelKind};
pub use validate::{SequenceAnchor, ValidateConfig};

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use strata_core::instance::Instance;

    use super::*;

    const STATES: [&str; 4] = ["selected", "unselected", "dimpled", "perforated"];

    fn chad_state() -> ModelDef {
        ModelBuilder::new("ChadState")
            .choice_in(1, 3, |c| {
                for state in STATES {
                    c.attribute(state, AttributeType::Boolean);
                }
            })
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn choice_accepts_exactly_its_range(
            present in prop::collection::vec(any::<Option<bool>>(), 4)
        ) {
            let model = chad_state();
            let mut instance = Instance::new("ChadState");
            for (state, value) in STATES.iter().zip(&present) {
                if let Some(value) = value {
                    instance.set(*state, *value);
                }
            }

            let count = present.iter().filter(|value| value.is_some()).count();
            let failures = model.validate(&instance);
            prop_assert_eq!(failures.is_empty(), (1..=3).contains(&count));
        }

        #[test]
        fn sequence_accepts_declared_order(extra in prop::collection::vec("[x-z]", 0..4)) {
            use strata_core::document::ElementOrder;

            let model = ModelBuilder::new("Abc")
                .sequence(|s| {
                    s.attribute("a", AttributeType::String)
                        .attribute("b", AttributeType::String)
                        .attribute("c", AttributeType::String);
                })
                .build()
                .unwrap();

            let mut order: Vec<String> = extra.clone();
            order.extend(["a", "b", "c"].map(String::from));
            order.extend(extra);

            let instance = Instance::new("Abc")
                .with("a", "1")
                .with("b", "2")
                .with("c", "3")
                .with_element_order(ElementOrder::from_names(order.iter().map(String::as_str)));

            prop_assert!(model.validate(&instance).is_empty());
        }
    }
}
