//! Mapping groups.
//!
//! Rules declared inside one mapping group share a single custom read/write
//! pair. During a pass the [`GroupCollector`] gathers the group's fields and
//! invokes the shared function once per group, not once per rule.

use std::fmt;

use indexmap::IndexMap;
use log::trace;

use strata_core::{
    instance::Instance,
    value::{Map, Value},
};

use crate::{
    error::MappingError,
    mapping::{
        MappingRule,
        rule::{ReadFn, WriteFn},
    },
};

/// Identity of a mapping group, assigned when the group is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

struct Bucket {
    read: ReadFn,
    write: WriteFn,
    values: Map,
    flushed: bool,
}

/// Per-pass state for every mapping group a rule stream touches.
#[derive(Default)]
pub struct GroupCollector {
    buckets: IndexMap<GroupId, Bucket>,
}

impl GroupCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups seen so far.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Registers the group of a grouped rule. Ungrouped rules are ignored.
    pub fn open(&mut self, rule: &MappingRule) {
        self.bucket(rule);
    }

    /// Accumulates a document value under the rule's field name.
    pub fn add(&mut self, rule: &MappingRule, value: Value) {
        if let Some(bucket) = self.bucket(rule) {
            bucket.values.insert(rule.name().to_name(), value);
        }
    }

    /// Runs the group's write function once and merges what it wrote into
    /// `doc`. Later calls for the same group do nothing.
    pub fn flush(
        &mut self,
        group: GroupId,
        model: &Instance,
        doc: &mut Map,
    ) -> Result<(), MappingError> {
        let Some(bucket) = self.buckets.get_mut(&group) else {
            return Ok(());
        };
        if bucket.flushed {
            return Ok(());
        }
        bucket.flushed = true;

        let mut section = std::mem::take(&mut bucket.values);
        (bucket.write)(model, &mut section)?;
        trace!(group:% = group, fields = section.len(); "Flushed mapping group");
        doc.extend(section);
        Ok(())
    }

    /// Runs each group's read function once with the values collected for
    /// it.
    pub fn apply(self, model: &mut Instance) -> Result<(), MappingError> {
        for (group, bucket) in self.buckets {
            trace!(group:% = group, fields = bucket.values.len(); "Applying mapping group");
            (bucket.read)(model, &Value::Map(bucket.values))?;
        }
        Ok(())
    }

    fn bucket(&mut self, rule: &MappingRule) -> Option<&mut Bucket> {
        let group = rule.group()?;
        let custom = rule.custom()?;
        Some(self.buckets.entry(group).or_insert_with(|| Bucket {
            read: custom.read.clone(),
            write: custom.write.clone(),
            values: Map::new(),
            flushed: false,
        }))
    }
}

impl fmt::Debug for GroupCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.buckets.keys()).finish()
    }
}
