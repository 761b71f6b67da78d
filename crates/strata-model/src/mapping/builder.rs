//! Builders for declaring mapping rules.

use std::sync::Arc;

use strata_core::{
    identifier::Id,
    instance::Instance,
    value::{Map, Value},
};

use crate::{
    error::{Diagnostic, ErrorCode, MappingError},
    mapping::{
        Format, GroupId, MappingRule,
        rule::{CustomMethods, ReadFn, WriteFn},
    },
};

/// Declares the rules of one format's mapping.
///
/// Obtained from [`crate::ModelBuilder::mapping`].
pub struct MappingBuilder<'a> {
    format: Format,
    rules: Vec<RuleBuilder>,
    next_group: &'a mut usize,
}

impl<'a> MappingBuilder<'a> {
    pub(crate) fn new(format: Format, next_group: &'a mut usize) -> Self {
        Self {
            format,
            rules: Vec::new(),
            next_group,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Starts a rule for the named document field.
    pub fn map(&mut self, name: impl Into<Id>) -> &mut RuleBuilder {
        let index = self.rules.len();
        self.rules.push(RuleBuilder::new(name.into()));
        &mut self.rules[index]
    }

    /// Declares a mapping group: every field mapped inside `f` is read and
    /// written by one shared function pair, once per pass.
    pub fn group<R, W>(
        &mut self,
        read: R,
        write: W,
        f: impl FnOnce(&mut GroupBuilder<'_>),
    ) -> &mut Self
    where
        R: Fn(&mut Instance, &Value) -> Result<(), MappingError> + Send + Sync + 'static,
        W: Fn(&Instance, &mut Map) -> Result<(), MappingError> + Send + Sync + 'static,
    {
        let id = GroupId::new(*self.next_group);
        *self.next_group += 1;

        let mut group = GroupBuilder {
            rules: &mut self.rules,
            id,
            custom: CustomMethods {
                read: Arc::new(read),
                write: Arc::new(write),
            },
        };
        f(&mut group);
        self
    }

    /// Converts the declared rules, reporting incomplete ones.
    pub(crate) fn finish(self) -> (Vec<MappingRule>, Vec<Diagnostic>) {
        let mut rules = Vec::with_capacity(self.rules.len());
        let mut diagnostics = Vec::new();

        for rule in self.rules {
            match rule.finish() {
                Ok(rule) => rules.push(rule),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }
        (rules, diagnostics)
    }
}

/// Declares the fields of a mapping group.
pub struct GroupBuilder<'a> {
    rules: &'a mut Vec<RuleBuilder>,
    id: GroupId,
    custom: CustomMethods,
}

impl GroupBuilder<'_> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Adds a field handled by the group's functions.
    pub fn map(&mut self, name: impl Into<Id>) -> &mut Self {
        let mut rule = RuleBuilder::new(name.into());
        rule.read = Some(self.custom.read.clone());
        rule.write = Some(self.custom.write.clone());
        rule.group = Some(self.id);
        self.rules.push(rule);
        self
    }
}

/// Declares one mapping rule.
pub struct RuleBuilder {
    name: Id,
    to: Option<Id>,
    read: Option<ReadFn>,
    write: Option<WriteFn>,
    delegate: Option<Id>,
    render_nil: Option<bool>,
    group: Option<GroupId>,
}

impl RuleBuilder {
    fn new(name: Id) -> Self {
        Self {
            name,
            to: None,
            read: None,
            write: None,
            delegate: None,
            render_nil: None,
            group: None,
        }
    }

    /// Maps the field to an attribute.
    pub fn to(&mut self, attribute: impl Into<Id>) -> &mut Self {
        self.to = Some(attribute.into());
        self
    }

    /// Reads and writes the field through custom functions.
    pub fn with<R, W>(&mut self, read: R, write: W) -> &mut Self
    where
        R: Fn(&mut Instance, &Value) -> Result<(), MappingError> + Send + Sync + 'static,
        W: Fn(&Instance, &mut Map) -> Result<(), MappingError> + Send + Sync + 'static,
    {
        self.with_read(read).with_write(write)
    }

    /// Sets only the custom read function.
    ///
    /// A rule must end up with both functions or neither.
    pub fn with_read(
        &mut self,
        read: impl Fn(&mut Instance, &Value) -> Result<(), MappingError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.read = Some(Arc::new(read));
        self
    }

    /// Sets only the custom write function.
    pub fn with_write(
        &mut self,
        write: impl Fn(&Instance, &mut Map) -> Result<(), MappingError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.write = Some(Arc::new(write));
        self
    }

    /// Reads and writes the target on the nested instance held by
    /// `attribute`.
    pub fn delegate(&mut self, attribute: impl Into<Id>) -> &mut Self {
        self.delegate = Some(attribute.into());
        self
    }

    pub fn render_nil(&mut self, render: bool) -> &mut Self {
        self.render_nil = Some(render);
        self
    }

    fn finish(self) -> Result<MappingRule, Diagnostic> {
        let custom = match (self.read, self.write) {
            (Some(read), Some(write)) => Some(CustomMethods { read, write }),
            (None, None) if self.to.is_some() => None,
            (None, None) => {
                return Err(Diagnostic::error(format!(
                    "`to` or `with` argument is required for mapping '{}'",
                    self.name
                ))
                .with_code(ErrorCode::E105)
                .with_help(
                    "map the field to an attribute, or give it custom read and write functions",
                ));
            }
            _ => {
                return Err(Diagnostic::error(format!(
                    "`with` argument for mapping '{}' requires both read and write functions",
                    self.name
                ))
                .with_code(ErrorCode::E105));
            }
        };

        Ok(MappingRule::new(
            self.name,
            self.to,
            custom,
            self.delegate,
            self.group,
            self.render_nil,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(f: impl FnOnce(&mut MappingBuilder<'_>)) -> (Vec<MappingRule>, Vec<Diagnostic>) {
        let mut next_group = 0;
        let mut builder = MappingBuilder::new(Format::KeyValue, &mut next_group);
        f(&mut builder);
        builder.finish()
    }

    #[test]
    fn test_rule_without_target_or_functions() {
        let (rules, diagnostics) = finish(|m| {
            m.map("name");
        });

        assert!(rules.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E105));
        assert_eq!(
            diagnostics[0].message(),
            "`to` or `with` argument is required for mapping 'name'"
        );
    }

    #[test]
    fn test_rule_with_half_a_pair() {
        let (_, diagnostics) = finish(|m| {
            m.map("name").to("name").with_read(|_, _| Ok(()));
        });

        assert_eq!(
            diagnostics[0].message(),
            "`with` argument for mapping 'name' requires both read and write functions"
        );
    }

    #[test]
    fn test_group_rules_share_id() {
        let mut next_group = 4;
        let mut builder = MappingBuilder::new(Format::Json, &mut next_group);
        builder.map("before").to("before");
        builder.group(
            |_, _| Ok(()),
            |_, _| Ok(()),
            |g| {
                g.map("one").map("two");
            },
        );
        let (rules, diagnostics) = builder.finish();

        assert!(diagnostics.is_empty());
        assert_eq!(next_group, 5);
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].group(), None);
        assert_eq!(rules[1].group(), Some(GroupId::new(4)));
        assert_eq!(rules[1].group(), rules[2].group());
        assert!(rules[2].has_custom_methods());
    }

    #[test]
    fn test_rule_options() {
        let (rules, _) = finish(|m| {
            m.map("city").to("city").delegate("address").render_nil(true);
        });

        assert_eq!(rules[0].delegate(), Some(Id::new("address")));
        assert_eq!(rules[0].render_nil(), Some(true));
    }
}
