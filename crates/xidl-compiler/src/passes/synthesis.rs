//! Synthesis Pass - Derive the implicit interfaces of each runtime class.
//!
//! - `I<Name>`: every instance member, for a non-static class with no
//!   requires clause
//! - `I<Name>Statics`: every static member, when there is at least one
//! - `I<Name>Factory`: one `CreateInstance` method per constructor that takes
//!   arguments, numbered `CreateInstance2`, `CreateInstance3` after the first
//!
//! Members keep the class's declaration order, so accessors stay interleaved
//! with explicit methods exactly as declared. Synthesized interfaces are
//! registered next to the class in the same namespace body.

use xidl_core::{
    ClassOrInterfaceModel, CycleState, ErrorKind, EventModel, MethodModel, ObjectId,
    PropertyModel, QualifiedName, SynthesizedInterfaces, TypeCategory, TypeRef, TypeTarget,
};

use crate::context::CompilationContext;

/// Output of the synthesis pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SynthesisOutput {
    pub interfaces: usize,
}

/// Members copied from a class into a synthesized interface.
#[derive(Debug, Default)]
struct MemberSubset {
    methods: Vec<MethodModel>,
    properties: Vec<PropertyModel>,
    events: Vec<EventModel>,
}

impl MemberSubset {
    /// Copy the static or instance members of `class`, remapping accessor
    /// indices into the new method list.
    fn of(class: &ClassOrInterfaceModel, statics: bool) -> Self {
        let mut subset = Self::default();
        let mut remap: Vec<Option<usize>> = vec![None; class.methods.len()];

        for (index, method) in class.methods.iter().enumerate() {
            if method.is_static == statics {
                remap[index] = Some(subset.methods.len());
                subset.methods.push(MethodModel {
                    is_static: false,
                    overridden: None,
                    ..method.clone()
                });
            }
        }

        for property in class.properties.iter().filter(|p| p.is_static == statics) {
            subset.properties.push(PropertyModel {
                is_static: false,
                get_method: property.get_method.and_then(|i| remap[i]),
                set_method: property.set_method.and_then(|i| remap[i]),
                overridden: None,
                ..property.clone()
            });
        }

        for event in class.events.iter().filter(|e| e.is_static == statics) {
            let (Some(add_method), Some(remove_method)) = (remap[event.add_method], remap[event.remove_method])
            else {
                continue;
            };
            subset.events.push(EventModel {
                is_static: false,
                add_method,
                remove_method,
                overridden: None,
                ..event.clone()
            });
        }

        subset
    }

    fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Default,
    Statics,
    Factory,
}

impl Role {
    fn interface_name(self, class: &str) -> String {
        match self {
            Role::Default => format!("I{class}"),
            Role::Statics => format!("I{class}Statics"),
            Role::Factory => format!("I{class}Factory"),
        }
    }
}

/// Name of the `n`th (zero-based) factory method.
pub fn factory_method_name(n: usize) -> String {
    match n {
        0 => "CreateInstance".to_string(),
        n => format!("CreateInstance{}", n + 1),
    }
}

/// Synthesize default, statics and factory interfaces.
pub struct SynthesisPass<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> SynthesisPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self) -> SynthesisOutput {
        let mut output = SynthesisOutput::default();

        for id in self.ctx.model.object_ids() {
            let class = self.ctx.model.object(id);
            let Some(data) = class.class_data() else {
                continue;
            };
            if data.synthesized != SynthesizedInterfaces::default() || class.synthesized_from.is_some() {
                continue;
            }

            let is_static = class.is_static_only();
            let mut plans: Vec<(Role, MemberSubset)> = Vec::with_capacity(3);

            if !is_static && class.requires.is_empty() {
                plans.push((Role::Default, MemberSubset::of(class, false)));
            }

            let statics = MemberSubset::of(class, true);
            if !statics.is_empty() {
                plans.push((Role::Statics, statics));
            }

            if !is_static {
                let factory = Self::factory_members(id, class);
                if !factory.is_empty() {
                    plans.push((Role::Factory, factory));
                }
            }

            for (role, members) in plans {
                let Some(interface) = self.register(id, role, members) else {
                    continue;
                };
                if let Some(data) = self.ctx.model.object_mut(id).class_data_mut() {
                    let slot = match role {
                        Role::Default => &mut data.synthesized.default,
                        Role::Statics => &mut data.synthesized.statics,
                        Role::Factory => &mut data.synthesized.factory,
                    };
                    *slot = Some(interface);
                }
                output.interfaces += 1;
            }
        }

        tracing::debug!(interfaces = output.interfaces, "synthesis complete");
        output
    }

    fn factory_members(id: ObjectId, class: &ClassOrInterfaceModel) -> MemberSubset {
        let returns = TypeRef::resolved(class.qualified_name().to_string(), TypeTarget::Class(id));
        let methods = class
            .class_data()
            .map(|data| data.constructors.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|ctor| !ctor.parameters.is_empty())
            .enumerate()
            .map(|(n, ctor)| MethodModel {
                parameters: ctor.parameters.clone(),
                ..MethodModel::new(factory_method_name(n), ctor.line).with_return(returns.clone())
            })
            .collect();
        MemberSubset {
            methods,
            ..MemberSubset::default()
        }
    }

    /// Add a synthesized interface beside class `id`.
    fn register(&mut self, id: ObjectId, role: Role, members: MemberSubset) -> Option<ObjectId> {
        let ctx = &mut *self.ctx;
        let class = ctx.model.object(id);
        let name = role.interface_name(&class.name);
        let qualified = QualifiedName::in_namespace(&class.namespace, name.as_str()).to_string();
        let line = class.line;

        let tree = ctx.model.namespaces();
        let node = tree.find(&class.namespace)?;
        if tree.lookup_member(node, &name).is_some() {
            ctx.diagnostics
                .report(ErrorKind::DuplicateNamespaceMember, line, qualified);
            return None;
        }
        let body = tree.get_namespace(node).and_then(|ns| {
            ns.bodies
                .iter()
                .position(|b| b.declarations.contains(&TypeCategory::Class(id)))
        })?;

        let mut interface =
            ClassOrInterfaceModel::new_interface(name.as_str(), class.namespace.as_str(), line, class.assembly.as_str());
        interface.methods = members.methods;
        interface.properties = members.properties;
        interface.events = members.events;
        interface.cycle = CycleState::Clear;
        interface.synthesized_from = Some(id);

        let interface_id = ctx.model.add_object(interface);
        let category = TypeCategory::Interface(interface_id);
        let added = ctx
            .model
            .namespaces_mut()
            .add_member(node, body, &name, category);
        debug_assert!(added.is_ok());
        ctx.symbols.insert(qualified.as_str(), category);

        tracing::debug!(class = %id.index(), interface = %qualified, ?role, "synthesized interface");
        Some(interface_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        ClassDecl, CompilationUnitDecl, ConstructorDecl, DelegateDecl, EventDecl, InterfaceDecl,
        MethodDecl, NamespaceDecl, PropertyDecl,
    };
    use crate::context::CompilerConfig;
    use crate::passes::{BuildPass, ResolutionPass};
    use xidl_core::{ClassModifiers, MethodAssociation};

    fn synthesize(ns: NamespaceDecl) -> CompilationContext {
        let mut ctx = CompilationContext::new(CompilerConfig::new());
        BuildPass::new(&mut ctx).run(&CompilationUnitDecl::new().with_namespace(ns));
        ResolutionPass::new(&mut ctx).run();
        SynthesisPass::new(&mut ctx).run();
        ctx
    }

    fn method_names(object: &ClassOrInterfaceModel) -> Vec<&str> {
        object.methods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn instance_and_static_members_split() {
        let ctx = synthesize(NamespaceDecl::new("N", 1).with(
            ClassDecl::new("Widget", 2)
                .with(MethodDecl::new("Draw", 3))
                .with(MethodDecl::new("Create", 4).with_static())
                .with(PropertyDecl::new("Size", 5, "Int32"))
                .with(PropertyDecl::new("Count", 6, "Int32").with_static().getter()),
        ));
        assert!(ctx.diagnostics.is_empty());

        let default = ctx.model.find_interface("N.IWidget").unwrap();
        assert_eq!(method_names(default), vec!["Draw", "get_Size", "put_Size"]);
        assert_eq!(default.properties[0].get_method, Some(1));
        assert!(default.methods.iter().all(|m| !m.is_static));

        let statics = ctx.model.find_interface("N.IWidgetStatics").unwrap();
        assert_eq!(method_names(statics), vec!["Create", "get_Count"]);
        assert_eq!(statics.properties[0].get_method, Some(1));
        assert_eq!(statics.methods[1].association, MethodAssociation::Property);

        assert!(ctx.model.find_interface("N.IWidgetFactory").is_none());
        let class = ctx.model.find_class("N.Widget").unwrap();
        let synthesized = class.class_data().unwrap().synthesized;
        assert!(synthesized.default.is_some());
        assert!(synthesized.statics.is_some());
        assert!(synthesized.factory.is_none());
        assert!(ctx.symbols.contains("N.IWidget"));
    }

    #[test]
    fn class_with_requires_gets_no_default_interface() {
        let ctx = synthesize(
            NamespaceDecl::new("N", 1)
                .with(InterfaceDecl::new("IRun", 2).with(MethodDecl::new("Run", 3)))
                .with(ClassDecl::new("Runner", 4).requires("IRun").with(MethodDecl::new("Run", 5))),
        );
        assert!(ctx.model.find_interface("N.IRunner").is_none());
    }

    #[test]
    fn factory_skips_default_constructor() {
        let ctx = synthesize(NamespaceDecl::new("N", 1).with(
            ClassDecl::new("Point", 2)
                .with(ConstructorDecl::new(3))
                .with(ConstructorDecl::new(4).with_param("x", "Int32"))
                .with(ConstructorDecl::new(5).with_param("x", "Int32").with_param("y", "Int32")),
        ));
        let factory = ctx.model.find_interface("N.IPointFactory").unwrap();
        assert_eq!(method_names(factory), vec!["CreateInstance", "CreateInstance2"]);
        assert_eq!(factory.methods[1].parameters.len(), 2);
        assert!(matches!(
            factory.methods[0].return_type.as_ref().and_then(TypeRef::target),
            Some(TypeTarget::Class(_))
        ));
    }

    #[test]
    fn events_keep_accessor_links() {
        let ctx = synthesize(
            NamespaceDecl::new("N", 1)
                .with(DelegateDecl::new("Handler", 2))
                .with(
                    ClassDecl::new("Button", 3)
                        .with(EventDecl::new("Clicked", 4, "Handler").with_static())
                        .with(MethodDecl::new("Press", 5)),
                ),
        );
        let statics = ctx.model.find_interface("N.IButtonStatics").unwrap();
        assert_eq!(method_names(statics), vec!["add_Clicked", "remove_Clicked"]);
        assert_eq!(statics.events[0].add_method, 0);
        assert_eq!(statics.events[0].remove_method, 1);
    }

    #[test]
    fn name_clash_is_reported() {
        let ctx = synthesize(
            NamespaceDecl::new("N", 1)
                .with(InterfaceDecl::new("IThing", 2))
                .with(ClassDecl::new("Thing", 3).with(MethodDecl::new("Go", 4))),
        );
        assert!(ctx
            .diagnostics
            .error_exists(ErrorKind::DuplicateNamespaceMember, "N.IThing", 3));
    }

    #[test]
    fn static_class_gets_statics_only() {
        let ctx = synthesize(NamespaceDecl::new("N", 1).with(
            ClassDecl::new("Math", 2)
                .with_modifiers(ClassModifiers::STATIC)
                .with(MethodDecl::new("Abs", 3).with_static().with_param("x", "Int32")),
        ));
        assert!(ctx.model.find_interface("N.IMath").is_none());
        assert!(ctx.model.find_interface("N.IMathStatics").is_some());
    }
}
