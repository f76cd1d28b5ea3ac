//! Enum Value Pass - Compute the value of every enum member.
//!
//! Members are resolved in declaration order. A member without an initializer
//! is zero when first, otherwise its predecessor plus one. A member naming
//! another member takes that member's value, resolving it first if needed.
//!
//! A cycle or a reference to an unknown member stops resolution of the whole
//! enum. A literal that does not fit the underlying type fails only that
//! member; members depending on it stay unresolved without further reports.

use rustc_hash::FxHashSet;
use xidl_core::{Diagnostics, EnumMemberValue, EnumModel, EnumValue, ErrorKind};

use crate::context::CompilationContext;

/// Output of the enum value pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnumValueOutput {
    /// Members that received a value.
    pub resolved_members: usize,
    /// Enums with at least one member left unresolved.
    pub incomplete_enums: usize,
}

/// Resolution of the enum stopped; no further members are attempted.
struct Abort;

/// Next move for a member on the work stack.
enum Step {
    /// The member's value is known, or it failed locally.
    Settle(Option<EnumValue>),
    /// The member waits for another member.
    After(usize),
}

/// Resolution state for one enum.
struct EnumResolver<'e, 'd> {
    en: &'e mut EnumModel,
    diagnostics: &'d mut Diagnostics,
    /// Members on the current dependency path.
    pending: FxHashSet<usize>,
    /// Members that failed locally and were already reported.
    failed: FxHashSet<usize>,
    resolved: usize,
}

impl EnumResolver<'_, '_> {
    fn run(&mut self) -> Result<(), Abort> {
        for index in 0..self.en.members.len() {
            self.resolve_member(index)?;
        }
        Ok(())
    }

    /// `Some(value)` once member `index` is settled, with `value` `None`
    /// when it failed locally.
    fn settled(&self, index: usize) -> Option<Option<EnumValue>> {
        match self.en.members[index].value {
            EnumMemberValue::Resolved(value) => Some(Some(value)),
            _ if self.failed.contains(&index) => Some(None),
            _ => None,
        }
    }

    /// Resolve member `root` and everything it depends on.
    ///
    /// Dependencies are kept on an explicit stack, so long implicit runs and
    /// reference chains cost heap, not call depth.
    fn resolve_member(&mut self, root: usize) -> Result<(), Abort> {
        let mut stack = vec![root];

        while let Some(&index) = stack.last() {
            if self.settled(index).is_some() {
                stack.pop();
                continue;
            }

            match self.step(index)? {
                Step::Settle(value) => {
                    match value {
                        Some(value) => {
                            self.en.members[index].value = EnumMemberValue::Resolved(value);
                            self.resolved += 1;
                        }
                        None => {
                            self.failed.insert(index);
                        }
                    }
                    self.pending.remove(&index);
                    stack.pop();
                }
                Step::After(dependency) => {
                    self.pending.insert(index);
                    if self.pending.contains(&dependency) {
                        let member = &self.en.members[dependency];
                        self.diagnostics.report(
                            ErrorKind::CircularEnumField,
                            member.line,
                            member.name.as_str(),
                        );
                        return Err(Abort);
                    }
                    stack.push(dependency);
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, index: usize) -> Result<Step, Abort> {
        let base = self.en.base;
        let member = &self.en.members[index];
        let line = member.line;

        let step = match &member.value {
            EnumMemberValue::Resolved(value) => Step::Settle(Some(*value)),
            EnumMemberValue::Literal(text) => {
                let value = base.parse_literal(text);
                Step::Settle(self.checked(index, value))
            }
            EnumMemberValue::Implicit if index == 0 => Step::Settle(Some(base.zero())),
            EnumMemberValue::Implicit => match self.settled(index - 1) {
                Some(Some(previous)) => Step::Settle(self.checked(index, base.increment(previous))),
                Some(None) => Step::Settle(None),
                None => Step::After(index - 1),
            },
            EnumMemberValue::Reference(name) => match self.en.find_member(name) {
                Some(target) => match self.settled(target) {
                    Some(value) => Step::Settle(value),
                    None => Step::After(target),
                },
                None => {
                    let name = name.clone();
                    self.diagnostics.report(ErrorKind::UnresolvedType, line, name);
                    return Err(Abort);
                }
            },
        };
        Ok(step)
    }

    /// Report an out-of-range value for member `index`.
    fn checked(&mut self, index: usize, value: Option<EnumValue>) -> Option<EnumValue> {
        if value.is_none() && self.failed.insert(index) {
            let member = &self.en.members[index];
            self.diagnostics
                .report(ErrorKind::EnumFieldOutOfRange, member.line, member.name.as_str());
        }
        value
    }
}

/// Resolve enum member values.
pub struct EnumValuePass<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> EnumValuePass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self) -> EnumValueOutput {
        let ctx = self.ctx;
        let mut output = EnumValueOutput::default();

        for id in ctx.model.enum_ids() {
            let en = ctx.model.enumeration_mut(id);
            let mut resolver = EnumResolver {
                en,
                diagnostics: &mut ctx.diagnostics,
                pending: FxHashSet::default(),
                failed: FxHashSet::default(),
                resolved: 0,
            };
            if resolver.run().is_err() {
                tracing::debug!(name = %resolver.en.name, "enum resolution stopped");
            }
            output.resolved_members += resolver.resolved;
            if !resolver.en.is_fully_resolved() {
                output.incomplete_enums += 1;
            }
        }

        output
    }
}
