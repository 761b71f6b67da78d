//! Declares a small content model, validates a few instances and writes one
//! of them as TOML.
//!
//! Run with `RUST_LOG=debug` to see the registry and validation logs.

use log::{LevelFilter, error, info};

use strata::{
    AttributeType, Format, ModelBuilder, Occurs, Strata, StrataError, document::ElementOrder,
    instance::Instance,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), StrataError> {
    let mut strata = Strata::default();

    strata.register(
        ModelBuilder::new("Ceramic")
            .sequence(|s| {
                s.attribute("tag", AttributeType::String)
                    .attribute("temperature", AttributeType::Integer)
                    .collection("glazes", AttributeType::String, Occurs::bounded(1, 3));
            })
            .choice(|c| {
                c.attribute("kiln", AttributeType::String)
                    .attribute("pit", AttributeType::String);
            }),
    )?;

    let ceramic = Instance::new("Ceramic")
        .with("tag", "Nik")
        .with("temperature", 1050)
        .with("glazes", vec!["Clear", "Celadon"])
        .with("kiln", "Electric")
        .with_element_order(ElementOrder::from_names([
            "tag",
            "temperature",
            "glazes",
            "glazes",
            "kiln",
        ]));

    strata.validate_strict(&ceramic)?;
    info!("Ceramic is valid");

    let fired_twice = ceramic.clone().with("pit", "Backyard");
    for failure in strata.validate(&fired_twice)? {
        info!(code:? = failure.code(); "{failure}");
    }

    let doc = strata.to_document(Format::Toml, &ceramic)?;
    match toml::to_string(&doc) {
        Ok(text) => println!("{text}"),
        Err(err) => error!("Failed to write TOML: {err}"),
    }

    Ok(())
}
