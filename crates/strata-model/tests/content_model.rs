use strata_core::{document::ElementOrder, identifier::Id, instance::Instance, value::Value};
use strata_model::{
    AttributeType, Format, ModelBuilder, ModelDef, Occurs, PassOptions,
    error::{ErrorCode, Failure},
};

fn chad_state() -> ModelDef {
    ModelBuilder::new("ChadState")
        .choice_in(1, 3, |c| {
            c.attribute("selected", AttributeType::Boolean)
                .attribute("unselected", AttributeType::Boolean)
                .attribute("dimpled", AttributeType::Boolean)
                .attribute("perforated", AttributeType::Boolean);
        })
        .build()
        .expect("Failed to declare ChadState")
}

#[test]
fn test_choice_range_three_of_four() {
    let model = chad_state();

    let within = Instance::new("ChadState")
        .with("selected", true)
        .with("unselected", true)
        .with("dimpled", false);
    assert!(model.validate(&within).is_empty());

    let beyond = within.with("perforated", true);
    let err = model
        .validate_strict(&beyond)
        .expect_err("four present states exceed the range");
    assert!(
        err.to_string()
            .contains("Attributes must be in specified range in a choice")
    );
    assert_eq!(err.failures()[0].code(), ErrorCode::E201);
}

#[test]
fn test_default_choice() {
    let model = ModelBuilder::new("PersonDetails")
        .choice(|c| {
            c.attribute("email", AttributeType::String)
                .attribute("phone", AttributeType::String);
        })
        .build()
        .expect("Failed to declare PersonDetails");

    let one = Instance::new("PersonDetails").with("phone", "02344");
    assert!(model.validate(&one).is_empty());

    for object in [
        Instance::new("PersonDetails"),
        one.clone().with("email", "john@example.com"),
    ] {
        let failures = model.validate(&object);
        assert!(
            matches!(failures.as_slice(), [Failure::InvalidChoice { .. }]),
            "unexpected failures: {failures:?}"
        );
        assert_eq!(
            failures[0].to_string().split(" (").next(),
            Some("Exactly one attribute must be specified in a choice")
        );
    }
}

#[test]
fn test_nested_choice_counts() {
    let model = ModelBuilder::new("PersonDetails")
        .choice_in(1, 2, |c| {
            c.attribute("first_name", AttributeType::String)
                .choice_in(2, 2, |inner| {
                    inner
                        .attribute("email", AttributeType::String)
                        .attribute("phone", AttributeType::String);
                });
        })
        .build()
        .expect("Failed to declare PersonDetails");

    let first_name = Instance::new("PersonDetails").with("first_name", "John");
    assert!(model.validate(&first_name).is_empty());

    let contact = Instance::new("PersonDetails")
        .with("email", "john@example.com")
        .with("phone", "02344");
    assert!(model.validate(&contact).is_empty());

    let everything = contact.with("first_name", "John");
    assert!(matches!(
        model.validate(&everything).as_slice(),
        [Failure::OutOfRangeChoice { .. }]
    ));
}

#[test]
fn test_declaration_errors_surface_before_instances() {
    let err = ModelBuilder::new("Broken")
        .choice_in(-1, -2, |c| {
            c.attribute("a", AttributeType::String);
        })
        .build()
        .expect_err("negative range must be rejected");
    assert!(err.has_code(ErrorCode::E103));
    assert_eq!(err.diagnostics()[0].message(), "Choice range must be positive");

    let err = ModelBuilder::group_class("GroupElement")
        .group(|g| {
            g.choice(|c| {
                c.attribute("one", AttributeType::String);
            })
            .choice(|c| {
                c.attribute("two", AttributeType::String);
            });
        })
        .build()
        .expect_err("two choices in a group must be rejected");
    assert!(err.has_code(ErrorCode::E100));
}

#[test]
fn test_sequence_order() {
    let model = ModelBuilder::new("Ceramic")
        .sequence(|s| {
            s.attribute("tag", AttributeType::String)
                .attribute("temperature", AttributeType::Integer)
                .attribute("glaze", AttributeType::String);
        })
        .build()
        .expect("Failed to declare Ceramic");

    let with_order = |names: &[&str]| {
        Instance::new("Ceramic")
            .with("tag", "Nik")
            .with("temperature", 1050)
            .with("glaze", "Clear")
            .with_element_order(ElementOrder::from_names(names.iter().copied()))
    };

    let interleaved = with_order(&["tag", "note", "temperature", "text", "color", "glaze"]);
    assert!(model.validate(&interleaved).is_empty());

    let swapped = with_order(&["temperature", "tag", "glaze"]);
    assert_eq!(
        model.validate(&swapped),
        [Failure::IncorrectSequence {
            expected: Id::new("temperature"),
            found: Some(Id::new("glaze")),
        }]
    );
}

#[test]
fn test_collection_counts() {
    let model = ModelBuilder::new("Post")
        .sequence(|s| {
            s.attribute("title", AttributeType::String).collection(
                "tags",
                AttributeType::String,
                Occurs::bounded(1, 3),
            );
        })
        .build()
        .expect("Failed to declare Post");

    let post = Instance::new("Post")
        .with("title", "Hello")
        .with("tags", vec!["a", "b", "c", "d"]);

    let failures = model.validate(&post);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code(), ErrorCode::E204);
}

#[test]
fn test_delegate_mapping_roundtrip() {
    let model = ModelBuilder::new("Person")
        .attribute("name", AttributeType::String)
        .attribute("address", AttributeType::Model(Id::new("Address")))
        .key_value(|m| {
            m.map("name").to("name");
            m.map("city").to("city").delegate("address");
        })
        .build()
        .expect("Failed to declare Person");

    let person = Instance::new("Person")
        .with("name", "Ann")
        .with("address", Instance::new("Address").with("city", "Oslo"));

    let doc = model
        .to_document(Format::Json, &person, &PassOptions::default())
        .expect("Failed to serialize");
    assert_eq!(doc.get("city"), Some(&Value::from("Oslo")));
    assert!(!doc.contains_key("address"));

    let back = model
        .from_document(Format::Yaml, &doc)
        .expect("Failed to deserialize");
    assert_eq!(back, person);
}

#[test]
fn test_models_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ModelDef>();

    let model = std::sync::Arc::new(chad_state());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let model = model.clone();
            std::thread::spawn(move || {
                let object = Instance::new("ChadState").with("dimpled", i % 2 == 0);
                model.validate(&object).is_empty()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("validation thread panicked"));
    }
}
