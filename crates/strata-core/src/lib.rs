//! Strata Core Types
//!
//! This crate provides the foundational types shared by the Strata content
//! model and its format adapters:
//!
//! - **Identifiers**: string-interned names ([`identifier::Id`])
//! - **Values**: materialized field values ([`value::Value`])
//! - **Instances**: materialized model objects ([`instance::Instance`])
//! - **Document shape**: actual child order of a parsed node ([`document::ElementOrder`])

pub mod document;
pub mod identifier;
pub mod instance;
pub mod value;
