//! Member Validation Pass - Check member lists against each other and against
//! inherited members.
//!
//! ## Checks
//!
//! Within one class or interface:
//! - Two explicit methods with the same signature (name plus parameter types;
//!   return types are ignored)
//! - Explicit methods named like an existing property or event accessor
//!
//! Against the transitive closure of required interfaces:
//! - An explicit method matching an inherited method's signature. A class
//!   redeclaring an explicit interface method with the same return type is
//!   linked to it instead.
//! - A property or event named like an inherited member of another kind
//! - A property or event re-declared from a base. A class re-declaring one
//!   with the same type is linked to it instead.
//!
//! Static-only classes report every instance member.
//!
//! Findings for a declaration are collected against a shared borrow of the
//! model and applied afterwards.

use std::collections::VecDeque;
use std::collections::hash_map::Entry;

use rustc_hash::{FxHashMap, FxHashSet};
use xidl_core::{
    ClassOrInterfaceModel, ErrorKind, MemberRef, MethodModel, ObjectId, TypeHash, adder_name,
    getter_name, remover_name, setter_name,
};
use xidl_registry::TypeModel;

use crate::context::CompilationContext;

/// Output of the member validation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemberValidationOutput {
    pub conflicts: usize,
    pub overrides: usize,
}

#[derive(Debug)]
enum Finding {
    Report(ErrorKind, u32, String),
    OverridesMethod { index: usize, base: MemberRef },
    OverridesProperty { index: usize, base: MemberRef },
    OverridesEvent { index: usize, base: MemberRef },
}

#[derive(Default)]
struct Findings {
    items: Vec<Finding>,
    /// Methods already reported as overloads.
    overloaded: FxHashSet<usize>,
}

impl Findings {
    fn report(&mut self, kind: ErrorKind, line: u32, symbol: &str) {
        self.items.push(Finding::Report(kind, line, symbol.to_string()));
    }

    fn cannot_overload(&mut self, index: usize, method: &MethodModel) {
        if self.overloaded.insert(index) {
            self.report(ErrorKind::CannotOverloadMethod, method.line, &method.name);
        }
    }
}

/// Local interfaces required by `id`, directly or transitively, nearest first.
///
/// Imported and unresolved bases contribute nothing.
pub fn inherited_interfaces(model: &TypeModel, id: ObjectId) -> Vec<ObjectId> {
    let mut seen = FxHashSet::default();
    seen.insert(id);
    let mut order = Vec::new();
    let mut queue: VecDeque<ObjectId> = direct_bases(model.object(id)).collect();

    while let Some(base) = queue.pop_front() {
        if seen.insert(base) {
            order.push(base);
            queue.extend(direct_bases(model.object(base)));
        }
    }
    order
}

fn direct_bases(object: &ClassOrInterfaceModel) -> impl Iterator<Item = ObjectId> + '_ {
    object
        .requires
        .iter()
        .filter_map(|base| base.target()?.as_interface())
}

fn explicit_methods(object: &ClassOrInterfaceModel) -> impl Iterator<Item = (usize, &MethodModel)> {
    object.methods.iter().enumerate().filter(|(_, m)| m.is_explicit())
}

// ==========================================================================
// Checks
// ==========================================================================

fn check_own_members(object: &ClassOrInterfaceModel, findings: &mut Findings) {
    let mut by_signature: FxHashMap<TypeHash, usize> = FxHashMap::default();
    for (index, method) in explicit_methods(object) {
        match by_signature.entry(method.signature()) {
            Entry::Occupied(first) => {
                let first = *first.get();
                findings.cannot_overload(first, &object.methods[first]);
                findings.cannot_overload(index, method);
            }
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }

    for (index, method) in explicit_methods(object) {
        for property in &object.properties {
            let collides = (property.get_method.is_some() && method.name == getter_name(&property.name))
                || (property.set_method.is_some() && method.name == setter_name(&property.name));
            if collides {
                findings.report(ErrorKind::DuplicatePropertyAccessor, property.line, &property.name);
                findings.cannot_overload(index, method);
            }
        }
        for event in &object.events {
            if method.name == adder_name(&event.name) || method.name == remover_name(&event.name) {
                findings.report(ErrorKind::ConflictingEventAccessorMethods, event.line, &event.name);
                findings.cannot_overload(index, method);
            }
        }
    }
}

fn check_inherited_methods(
    model: &TypeModel,
    object: &ClassOrInterfaceModel,
    bases: &[ObjectId],
    findings: &mut Findings,
) {
    for (index, method) in explicit_methods(object) {
        let signature = method.signature();
        let inherited = bases.iter().find_map(|&base| {
            model
                .object(base)
                .methods
                .iter()
                .position(|m| m.signature() == signature)
                .map(|position| MemberRef::new(base, position))
        });
        let Some(base) = inherited else {
            continue;
        };

        let base_method = &model.object(base.owner).methods[base.index];
        if object.is_class() && base_method.is_explicit() && base_method.return_type == method.return_type {
            findings.items.push(Finding::OverridesMethod { index, base });
        } else {
            findings.cannot_overload(index, method);
        }
    }
}

fn check_inherited_properties(
    model: &TypeModel,
    object: &ClassOrInterfaceModel,
    bases: &[ObjectId],
    findings: &mut Findings,
) {
    for (index, property) in object.properties.iter().enumerate() {
        for &base_id in bases {
            let base = model.object(base_id);
            if let Some(position) = base.find_property(&property.name) {
                let base_property = &base.properties[position];
                if object.is_class() && base_property.type_ref == property.type_ref {
                    findings.items.push(Finding::OverridesProperty {
                        index,
                        base: MemberRef::new(base_id, position),
                    });
                    let accessors = [
                        (property.get_method, base_property.get_method),
                        (property.set_method, base_property.set_method),
                    ];
                    for (own, inherited) in accessors {
                        if let (Some(index), Some(inherited)) = (own, inherited) {
                            findings.items.push(Finding::OverridesMethod {
                                index,
                                base: MemberRef::new(base_id, inherited),
                            });
                        }
                    }
                } else {
                    findings.report(ErrorKind::DuplicateTypeMemberId, property.line, &property.name);
                }
                break;
            }
            if has_other_member(base, &property.name, MemberKind::Property) {
                findings.report(ErrorKind::ConflictingInheritanceMember, property.line, &property.name);
                break;
            }
        }
    }
}

fn check_inherited_events(
    model: &TypeModel,
    object: &ClassOrInterfaceModel,
    bases: &[ObjectId],
    findings: &mut Findings,
) {
    for (index, event) in object.events.iter().enumerate() {
        for &base_id in bases {
            let base = model.object(base_id);
            if let Some(position) = base.find_event(&event.name) {
                let base_event = &base.events[position];
                if object.is_class() && base_event.type_ref == event.type_ref {
                    findings.items.push(Finding::OverridesEvent {
                        index,
                        base: MemberRef::new(base_id, position),
                    });
                    findings.items.push(Finding::OverridesMethod {
                        index: event.add_method,
                        base: MemberRef::new(base_id, base_event.add_method),
                    });
                    findings.items.push(Finding::OverridesMethod {
                        index: event.remove_method,
                        base: MemberRef::new(base_id, base_event.remove_method),
                    });
                } else {
                    findings.report(ErrorKind::DuplicateTypeMemberId, event.line, &event.name);
                }
                break;
            }
            if has_other_member(base, &event.name, MemberKind::Event) {
                findings.report(ErrorKind::ConflictingInheritanceMember, event.line, &event.name);
                break;
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Property,
    Event,
}

/// Whether `base` has a member named `name` that is not a `kind`.
fn has_other_member(base: &ClassOrInterfaceModel, name: &str, kind: MemberKind) -> bool {
    let explicit_method = base.methods.iter().any(|m| m.is_explicit() && m.name == name);
    match kind {
        MemberKind::Property => explicit_method || base.find_event(name).is_some(),
        MemberKind::Event => explicit_method || base.find_property(name).is_some(),
    }
}

fn check_static_only(object: &ClassOrInterfaceModel, findings: &mut Findings) {
    if !object.is_static_only() {
        return;
    }
    for (_, method) in explicit_methods(object).filter(|(_, m)| !m.is_static) {
        findings.report(ErrorKind::StaticMemberOnly, method.line, &method.name);
    }
    for property in object.properties.iter().filter(|p| !p.is_static) {
        findings.report(ErrorKind::StaticMemberOnly, property.line, &property.name);
    }
    for event in object.events.iter().filter(|e| !e.is_static) {
        findings.report(ErrorKind::StaticMemberOnly, event.line, &event.name);
    }
    if let Some(class) = object.class_data() {
        for constructor in &class.constructors {
            findings.report(ErrorKind::StaticMemberOnly, constructor.line, &object.name);
        }
    }
}

/// Validate member lists of every class and interface.
pub struct MemberValidationPass<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> MemberValidationPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self) -> MemberValidationOutput {
        let ctx = self.ctx;
        let mut output = MemberValidationOutput::default();

        for id in ctx.model.object_ids() {
            let findings = Self::check(&ctx.model, id);

            let object = ctx.model.object_mut(id);
            for finding in findings.items {
                match finding {
                    Finding::Report(kind, line, symbol) => {
                        ctx.diagnostics.report(kind, line, symbol);
                        output.conflicts += 1;
                    }
                    Finding::OverridesMethod { index, base } => {
                        object.methods[index].overridden = Some(base);
                        output.overrides += 1;
                    }
                    Finding::OverridesProperty { index, base } => {
                        object.properties[index].overridden = Some(base);
                        output.overrides += 1;
                    }
                    Finding::OverridesEvent { index, base } => {
                        object.events[index].overridden = Some(base);
                        output.overrides += 1;
                    }
                }
            }
        }

        tracing::debug!(
            conflicts = output.conflicts,
            overrides = output.overrides,
            "member validation complete"
        );
        output
    }

    fn check(model: &TypeModel, id: ObjectId) -> Findings {
        let object = model.object(id);
        let bases = inherited_interfaces(model, id);
        let mut findings = Findings::default();

        check_own_members(object, &mut findings);
        check_inherited_methods(model, object, &bases, &mut findings);
        check_inherited_properties(model, object, &bases, &mut findings);
        check_inherited_events(model, object, &bases, &mut findings);
        check_static_only(object, &mut findings);
        findings
    }
}
