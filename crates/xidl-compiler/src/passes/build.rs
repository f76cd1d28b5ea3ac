//! Build Pass (Pass 0) - Create the type model from the declaration tree.
//!
//! This pass implements [`DeclarationListener`] and is driven by [`walk`]. It
//! creates every namespace, namespace body and declaration, registers each
//! declaration in the symbol table, and builds member lists in declaration
//! order. Type references are stored by name; nothing is resolved here.
//!
//! ## Responsibilities
//!
//! - Unique declaration names across all bodies of a namespace
//! - Namespace names that differ only by case
//! - Duplicate struct fields and enum members
//! - Property accessor bodies, fragment merging and accessor synthesis
//! - Event accessor synthesis (explicit accessor bodies are rejected)

use rustc_hash::{FxHashMap, FxHashSet};
use xidl_core::{
    ClassOrInterfaceModel, ConstructorModel, DelegateModel, EnumId, EnumMember, EnumMemberValue,
    EnumModel, ErrorKind, EventModel, FieldModel, FormalParameterModel, MethodModel, ObjectId,
    PropertyModel, QualifiedName, StructId, StructModel, TypeCategory, TypeRef,
};
use xidl_registry::{NodeIndex, TypeModel};

use crate::ast::{
    AccessorKind, ClassDecl, CompilationUnitDecl, ConstructorDecl, DelegateDecl, EnumDecl,
    EnumMemberDecl, EventDecl, FieldDecl, InterfaceDecl, MethodDecl, NamespaceDecl, ParameterDecl,
    PropertyDecl, StructDecl,
};
use crate::context::CompilationContext;
use crate::listener::{DeclarationListener, walk};
use crate::passes::resolution::lookup_key;

/// Output of the build pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Physical namespace bodies opened.
    pub namespace_bodies: usize,
    /// Declarations added to the model.
    pub declarations: usize,
    /// Declarations skipped because their name was taken.
    pub skipped: usize,
}

/// The declaration whose members are currently being visited.
#[derive(Debug, Clone, Copy)]
enum Current {
    None,
    /// A duplicate declaration; its members are ignored.
    Skipped,
    Object(ObjectId),
    Struct(StructId),
    Enum(EnumId),
}

/// Pass 0: build the type model.
pub struct BuildPass<'a> {
    ctx: &'a mut CompilationContext,
    /// Open namespace bodies, innermost last.
    scopes: Vec<(NodeIndex, usize)>,
    current: Current,
    /// Property fragments seen in the current class or interface.
    property_fragments: FxHashMap<String, u32>,
    /// Properties already reported as INVALID_PROPERTY_ACCESSOR.
    invalid_properties: FxHashSet<String>,
    output: BuildOutput,
}

impl<'a> BuildPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self {
            ctx,
            scopes: Vec::new(),
            current: Current::None,
            property_fragments: FxHashMap::default(),
            invalid_properties: FxHashSet::default(),
            output: BuildOutput::default(),
        }
    }

    /// Run the build pass over a compilation unit.
    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, unit: &CompilationUnitDecl) -> BuildOutput {
        walk(unit, &mut self);
        tracing::debug!(
            bodies = self.output.namespace_bodies,
            declarations = self.output.declarations,
            skipped = self.output.skipped,
            "build pass complete"
        );
        self.output
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Register a namespace-level declaration named `name`.
    ///
    /// On a name clash the duplicate is reported and `create` is never called,
    /// so the arena only ever holds reachable declarations.
    fn declare(
        &mut self,
        name: &str,
        line: u32,
        create: impl FnOnce(&mut TypeModel, String) -> TypeCategory,
    ) -> Option<TypeCategory> {
        let Some(&(node, body)) = self.scopes.last() else {
            tracing::warn!(name, line, "declaration outside any namespace ignored");
            return None;
        };

        let ctx = &mut *self.ctx;
        let namespace = ctx.model.namespaces().qualified_name(node).to_string();
        let qualified = QualifiedName::in_namespace(&namespace, name).to_string();

        if ctx.model.namespaces().lookup_member(node, name).is_some() {
            ctx.diagnostics
                .report(ErrorKind::DuplicateNamespaceMember, line, qualified);
            self.output.skipped += 1;
            return None;
        }

        let category = create(&mut ctx.model, namespace);
        let added = ctx
            .model
            .namespaces_mut()
            .add_member(node, body, name, category);
        debug_assert!(added.is_ok());
        ctx.symbols.insert(qualified, category);
        self.output.declarations += 1;
        Some(category)
    }

    fn assembly(&self) -> String {
        self.ctx.config.assembly_name.clone()
    }

    fn begin_members(&mut self, current: Current) {
        self.current = current;
        self.property_fragments.clear();
        self.invalid_properties.clear();
    }

    /// Report properties that ended up without a getter.
    fn finish_object(&mut self) {
        if let Current::Object(id) = self.current {
            let ctx = &mut *self.ctx;
            for property in &ctx.model.object(id).properties {
                if property.get_method.is_none()
                    && !self.invalid_properties.contains(&property.name)
                {
                    ctx.diagnostics.report(
                        ErrorKind::InvalidPropertyAccessor,
                        property.line,
                        property.name.as_str(),
                    );
                }
            }
        }
        self.current = Current::None;
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    /// Accessors requested by a property declaration, in written order.
    ///
    /// Malformed bodies are reported here; whatever valid accessors remain
    /// are still returned.
    fn accessor_plan(&mut self, decl: &PropertyDecl) -> Vec<(AccessorKind, u32)> {
        let Some(accessors) = &decl.accessors else {
            return vec![(AccessorKind::Get, decl.line), (AccessorKind::Set, decl.line)];
        };

        let diagnostics = &mut self.ctx.diagnostics;
        let mut plan: Vec<(AccessorKind, u32)> = Vec::with_capacity(2);
        let mut invalid = false;

        if accessors.is_empty() {
            diagnostics.report(ErrorKind::InvalidPropertyAccessor, decl.line, decl.name.as_str());
            invalid = true;
        }

        for accessor in accessors {
            match &accessor.kind {
                kind @ (AccessorKind::Get | AccessorKind::Set) => {
                    if plan.iter().any(|(k, _)| k == kind) {
                        diagnostics.report(
                            ErrorKind::DuplicatePropertyAccessor,
                            accessor.line,
                            decl.name.as_str(),
                        );
                    } else {
                        plan.push((kind.clone(), accessor.line));
                    }
                }
                _ => {
                    diagnostics.report(ErrorKind::InvalidPropertyAccessor, decl.line, decl.name.as_str());
                    invalid = true;
                }
            }
        }

        // Duplicates alone leave the missing getter to finish_object.
        if invalid {
            self.invalid_properties.insert(decl.name.clone());
        }
        plan
    }

    fn add_property(&mut self, id: ObjectId, decl: &PropertyDecl) {
        let plan = self.accessor_plan(decl);
        let fragment = {
            let count = self.property_fragments.entry(decl.name.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let ctx = &mut *self.ctx;
        let object = ctx.model.object_mut(id);
        if object.find_event(&decl.name).is_some() {
            ctx.diagnostics
                .report(ErrorKind::DuplicateTypeMemberId, decl.line, decl.name.as_str());
            return;
        }

        let type_ref = TypeRef::parse(&decl.type_name);
        let index = match object.find_property(&decl.name) {
            None => {
                let mut property = PropertyModel::new(decl.name.as_str(), decl.line, type_ref);
                property.is_static = decl.is_static;
                object.properties.push(property);
                object.properties.len() - 1
            }
            Some(index) => {
                let existing = &object.properties[index];
                if fragment >= 3
                    || !same_type(&object.namespace, &existing.type_ref, &type_ref)
                    || existing.is_static != decl.is_static
                {
                    ctx.diagnostics
                        .report(ErrorKind::DuplicateTypeMemberId, decl.line, decl.name.as_str());
                    return;
                }
                let overlaps = plan.iter().any(|(kind, _)| match kind {
                    AccessorKind::Get => existing.get_method.is_some(),
                    _ => existing.set_method.is_some(),
                });
                if overlaps {
                    ctx.diagnostics.report(
                        ErrorKind::InvalidOrDuplicatePropertyAccessor,
                        decl.line,
                        decl.name.as_str(),
                    );
                    return;
                }
                index
            }
        };

        for (kind, line) in plan {
            let property = &object.properties[index];
            if kind == AccessorKind::Get {
                let getter = property.make_getter(line);
                let method = object.add_method(getter);
                object.properties[index].get_method = Some(method);
            } else {
                let setter = property.make_setter(line);
                let method = object.add_method(setter);
                object.properties[index].set_method = Some(method);
            }
        }
    }
}

/// Whether two property fragments name the same type. Unresolved names are
/// compared by the key resolution would look them up under.
fn same_type(namespace: &str, existing: &TypeRef, candidate: &TypeRef) -> bool {
    if existing.is_resolved() || candidate.is_resolved() {
        return existing == candidate;
    }
    lookup_key(namespace, existing.name()) == lookup_key(namespace, candidate.name())
}

fn parameter(decl: &ParameterDecl) -> FormalParameterModel {
    FormalParameterModel::new(decl.name.as_str(), decl.line, TypeRef::parse(&decl.type_name))
        .with_semantics(decl.semantics)
}

fn enum_value(text: Option<&str>) -> EnumMemberValue {
    match text.map(str::trim) {
        None | Some("") => EnumMemberValue::Implicit,
        Some(text) if text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') => {
            EnumMemberValue::Literal(text.to_string())
        }
        Some(text) => EnumMemberValue::Reference(text.to_string()),
    }
}

impl DeclarationListener for BuildPass<'_> {
    fn enter_namespace(&mut self, decl: &NamespaceDecl) {
        let ctx = &mut *self.ctx;
        let tree = ctx.model.namespaces_mut();
        let mut node = self.scopes.last().map_or(tree.root(), |&(node, _)| node);

        for segment in decl.name.split('.').filter(|s| !s.is_empty()) {
            if tree.find_child(node, segment).is_none()
                && tree.find_case_conflict(node, segment).is_some()
            {
                let qualified = QualifiedName::in_namespace(tree.qualified_name(node), segment);
                ctx.diagnostics
                    .report(ErrorKind::NamespaceCaseConflict, decl.line, qualified.to_string());
            }
            node = tree.get_or_create_child(node, segment);
        }

        let body = tree.open_body(node, decl.line);
        self.scopes.push((node, body));
        self.output.namespace_bodies += 1;
    }

    fn exit_namespace(&mut self, _decl: &NamespaceDecl) {
        self.scopes.pop();
    }

    fn enter_class(&mut self, decl: &ClassDecl) {
        let assembly = self.assembly();
        let category = self.declare(&decl.name, decl.line, |model, namespace| {
            let mut class = ClassOrInterfaceModel::new_class(
                decl.name.as_str(),
                namespace,
                decl.line,
                assembly,
                decl.modifiers,
            );
            class.requires = decl.requires.iter().map(TypeRef::named).collect();
            TypeCategory::Class(model.add_object(class))
        });
        match category {
            Some(TypeCategory::Class(id)) => self.begin_members(Current::Object(id)),
            _ => self.begin_members(Current::Skipped),
        }
    }

    fn exit_class(&mut self, _decl: &ClassDecl) {
        self.finish_object();
    }

    fn enter_interface(&mut self, decl: &InterfaceDecl) {
        let assembly = self.assembly();
        let category = self.declare(&decl.name, decl.line, |model, namespace| {
            let mut interface =
                ClassOrInterfaceModel::new_interface(decl.name.as_str(), namespace, decl.line, assembly);
            interface.requires = decl.requires.iter().map(TypeRef::named).collect();
            TypeCategory::Interface(model.add_object(interface))
        });
        match category {
            Some(TypeCategory::Interface(id)) => self.begin_members(Current::Object(id)),
            _ => self.begin_members(Current::Skipped),
        }
    }

    fn exit_interface(&mut self, _decl: &InterfaceDecl) {
        self.finish_object();
    }

    fn enter_struct(&mut self, decl: &StructDecl) {
        let assembly = self.assembly();
        let category = self.declare(&decl.name, decl.line, |model, namespace| {
            TypeCategory::Struct(model.add_struct(StructModel::new(
                decl.name.as_str(),
                namespace,
                decl.line,
                assembly,
            )))
        });
        self.current = match category {
            Some(TypeCategory::Struct(id)) => Current::Struct(id),
            _ => Current::Skipped,
        };
    }

    fn exit_struct(&mut self, _decl: &StructDecl) {
        self.current = Current::None;
    }

    fn enter_field(&mut self, decl: &FieldDecl) {
        let Current::Struct(id) = self.current else {
            return;
        };
        let ctx = &mut *self.ctx;
        let st = ctx.model.structure_mut(id);
        if st.has_field(&decl.name) {
            ctx.diagnostics
                .report(ErrorKind::DuplicateFieldId, decl.line, decl.name.as_str());
            return;
        }
        st.fields.push(FieldModel {
            name: decl.name.clone(),
            line: decl.line,
            type_ref: TypeRef::parse(&decl.type_name),
        });
    }

    fn enter_enum(&mut self, decl: &EnumDecl) {
        let assembly = self.assembly();
        let category = self.declare(&decl.name, decl.line, |model, namespace| {
            TypeCategory::Enum(model.add_enum(EnumModel::new(
                decl.name.as_str(),
                namespace,
                decl.line,
                assembly,
                decl.base,
            )))
        });
        self.current = match category {
            Some(TypeCategory::Enum(id)) => Current::Enum(id),
            _ => Current::Skipped,
        };
    }

    fn exit_enum(&mut self, _decl: &EnumDecl) {
        self.current = Current::None;
    }

    fn enter_enum_member(&mut self, decl: &EnumMemberDecl) {
        let Current::Enum(id) = self.current else {
            return;
        };
        let ctx = &mut *self.ctx;
        let en = ctx.model.enumeration_mut(id);
        if en.find_member(&decl.name).is_some() {
            ctx.diagnostics
                .report(ErrorKind::DuplicateTypeMemberId, decl.line, decl.name.as_str());
            return;
        }
        en.members.push(EnumMember::new(
            decl.name.as_str(),
            decl.line,
            enum_value(decl.value.as_deref()),
        ));
    }

    fn enter_delegate(&mut self, decl: &DelegateDecl) {
        let assembly = self.assembly();
        self.declare(&decl.name, decl.line, |model, namespace| {
            let mut delegate = DelegateModel::new(decl.name.as_str(), namespace, decl.line, assembly);
            delegate.return_type = decl.return_type.as_deref().map(TypeRef::parse);
            delegate.parameters = decl.parameters.iter().map(parameter).collect();
            TypeCategory::Delegate(model.add_delegate(delegate))
        });
    }

    fn enter_method(&mut self, decl: &MethodDecl) {
        let Current::Object(id) = self.current else {
            return;
        };
        let mut method = MethodModel::new(decl.name.as_str(), decl.line).with_static(decl.is_static);
        method.return_type = decl.return_type.as_deref().map(TypeRef::parse);
        method.parameters = decl.parameters.iter().map(parameter).collect();
        self.ctx.model.object_mut(id).add_method(method);
    }

    fn enter_property(&mut self, decl: &PropertyDecl) {
        if let Current::Object(id) = self.current {
            self.add_property(id, decl);
        }
    }

    fn enter_event(&mut self, decl: &EventDecl) {
        let Current::Object(id) = self.current else {
            return;
        };
        let ctx = &mut *self.ctx;
        let object = ctx.model.object_mut(id);
        if object.find_event(&decl.name).is_some() || object.find_property(&decl.name).is_some() {
            ctx.diagnostics
                .report(ErrorKind::DuplicateTypeMemberId, decl.line, decl.name.as_str());
            return;
        }
        if decl.accessors.is_some() {
            ctx.diagnostics.report(
                ErrorKind::ConflictingEventAccessorMethods,
                decl.line,
                decl.name.as_str(),
            );
        }

        let type_ref = TypeRef::parse(&decl.type_name);
        let (adder, remover) =
            EventModel::make_accessors(&decl.name, decl.line, decl.is_static, &type_ref);
        let add_method = object.add_method(adder);
        let remove_method = object.add_method(remover);
        object.events.push(EventModel {
            name: decl.name.clone(),
            line: decl.line,
            is_static: decl.is_static,
            type_ref,
            add_method,
            remove_method,
            overridden: None,
        });
    }

    fn enter_constructor(&mut self, decl: &ConstructorDecl) {
        let Current::Object(id) = self.current else {
            return;
        };
        let object = self.ctx.model.object_mut(id);
        let Some(class) = object.class_data_mut() else {
            tracing::warn!(line = decl.line, "constructor in interface ignored");
            return;
        };
        let mut constructor = ConstructorModel::new(decl.line);
        constructor.parameters = decl.parameters.iter().map(parameter).collect();
        class.constructors.push(constructor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassDecl, NamespaceDecl};
    use crate::context::CompilerConfig;
    use xidl_core::{EnumValue, MethodAssociation};

    fn build(unit: CompilationUnitDecl) -> CompilationContext {
        let mut ctx = CompilationContext::new(CompilerConfig::new().with_assembly_name("test"));
        BuildPass::new(&mut ctx).run(&unit);
        ctx
    }

    fn unit(ns: NamespaceDecl) -> CompilationUnitDecl {
        CompilationUnitDecl::new().with_namespace(ns)
    }

    #[test]
    fn declarations_are_registered() {
        let ctx = build(unit(
            NamespaceDecl::new("N", 1)
                .with(StructDecl::new("S", 2).field("x", 3, "Int32"))
                .with(InterfaceDecl::new("I", 4))
                .with(DelegateDecl::new("D", 5).with_param("a", "Int32")),
        ));
        assert_eq!(ctx.diagnostics.semantic_error_count(), 0);
        assert!(ctx.symbols.contains("N.S"));
        assert!(ctx.symbols.contains("N.I"));
        assert!(ctx.symbols.contains("N.D"));
        assert_eq!(ctx.model.find_struct("N.S").map(|s| s.assembly.as_str()), Some("test"));
    }

    #[test]
    fn duplicate_across_bodies() {
        let ctx = build(
            CompilationUnitDecl::new()
                .with_namespace(NamespaceDecl::new("N", 1).with(EnumDecl::new("E", 2)))
                .with_namespace(NamespaceDecl::new("N", 5).with(StructDecl::new("E", 6))),
        );
        assert!(ctx
            .diagnostics
            .error_exists(ErrorKind::DuplicateNamespaceMember, "N.E", 6));
        assert_eq!(ctx.model.declaration_count(), 1);
        let ns = ctx.model.namespaces().find("N").unwrap();
        assert_eq!(ctx.model.namespaces().get_namespace(ns).unwrap().bodies.len(), 2);
    }

    #[test]
    fn nested_namespace_names() {
        let ctx = build(unit(
            NamespaceDecl::new("A", 1)
                .with_namespace(NamespaceDecl::new("B.C", 2).with(StructDecl::new("S", 3))),
        ));
        assert!(ctx.symbols.contains("A.B.C.S"));
        assert_eq!(ctx.model.find_struct("A.B.C.S").map(|s| s.namespace.as_str()), Some("A.B.C"));
    }

    #[test]
    fn namespace_case_conflict() {
        let ctx = build(
            CompilationUnitDecl::new()
                .with_namespace(NamespaceDecl::new("Root.Sub", 1))
                .with_namespace(NamespaceDecl::new("Root.sub", 4))
                .with_namespace(NamespaceDecl::new("Root.sub", 7)),
        );
        assert!(ctx
            .diagnostics
            .error_exists(ErrorKind::NamespaceCaseConflict, "Root.sub", 4));
        assert_eq!(ctx.diagnostics.count_of(ErrorKind::NamespaceCaseConflict), 1);
    }

    #[test]
    fn duplicate_struct_field() {
        let ctx = build(unit(
            NamespaceDecl::new("N", 1).with(
                StructDecl::new("S", 2)
                    .field("x", 3, "Int32")
                    .field("x", 4, "Int64"),
            ),
        ));
        assert!(ctx.diagnostics.error_exists(ErrorKind::DuplicateFieldId, "x", 4));
        assert_eq!(ctx.model.find_struct("N.S").unwrap().fields.len(), 1);
    }

    #[test]
    fn enum_member_classification() {
        let ctx = build(unit(
            NamespaceDecl::new("N", 1).with(
                EnumDecl::new("E", 2)
                    .member("A", 3, None)
                    .member("B", 4, Some("0x10"))
                    .member("C", 5, Some("A"))
                    .member("A", 6, Some("1")),
            ),
        ));
        let en = ctx.model.find_enum("N.E").unwrap();
        assert_eq!(en.members.len(), 3);
        assert_eq!(en.members[0].value, EnumMemberValue::Implicit);
        assert_eq!(en.members[1].value, EnumMemberValue::Literal("0x10".into()));
        assert_eq!(en.members[2].value, EnumMemberValue::Reference("A".into()));
        assert!(ctx.diagnostics.error_exists(ErrorKind::DuplicateTypeMemberId, "A", 6));
        assert_eq!(en.value_of("A"), None::<EnumValue>);
    }

    #[test]
    fn implicit_property_gets_both_accessors() {
        let ctx = build(unit(NamespaceDecl::new("N", 1).with(
            InterfaceDecl::new("I", 2).with(PropertyDecl::new("Width", 3, "Double")),
        )));
        let iface = ctx.model.find_interface("N.I").unwrap();
        let names: Vec<&str> = iface.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get_Width", "put_Width"]);
        assert!(iface
            .methods
            .iter()
            .all(|m| m.association == MethodAssociation::Property));
        assert_eq!(iface.properties[0].get_method, Some(0));
        assert_eq!(iface.properties[0].set_method, Some(1));
    }

    #[test]
    fn event_accessors_are_synthesized() {
        let ctx = build(unit(NamespaceDecl::new("N", 1).with(
            ClassDecl::new("C", 2)
                .with(MethodDecl::new("Run", 3))
                .with(EventDecl::new("Changed", 4, "Handler")),
        )));
        let class = ctx.model.find_class("N.C").unwrap();
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Run", "add_Changed", "remove_Changed"]);
        assert_eq!(class.events[0].add_method, 1);
        assert_eq!(class.events[0].remove_method, 2);
    }

    #[test]
    fn event_accessor_body_rejected() {
        let ctx = build(unit(NamespaceDecl::new("N", 1).with(
            InterfaceDecl::new("I", 2)
                .with(EventDecl::new("Changed", 3, "Handler").with_accessor(AccessorKind::Add)),
        )));
        assert!(ctx
            .diagnostics
            .error_exists(ErrorKind::ConflictingEventAccessorMethods, "Changed", 3));
    }

    #[test]
    fn members_of_duplicate_declaration_are_ignored() {
        let ctx = build(unit(
            NamespaceDecl::new("N", 1)
                .with(InterfaceDecl::new("I", 2))
                .with(InterfaceDecl::new("I", 3).with(PropertyDecl::new("P", 4, "Int32").setter())),
        ));
        assert_eq!(ctx.diagnostics.semantic_error_count(), 1);
        assert!(ctx.model.find_interface("N.I").unwrap().properties.is_empty());
    }

    #[test]
    fn constructors_recorded_on_class() {
        let ctx = build(unit(NamespaceDecl::new("N", 1).with(
            ClassDecl::new("C", 2)
                .with(ConstructorDecl::new(3))
                .with(ConstructorDecl::new(4).with_param("n", "Int32")),
        )));
        let class = ctx.model.find_class("N.C").unwrap();
        assert_eq!(class.class_data().unwrap().constructors.len(), 2);
    }
}
