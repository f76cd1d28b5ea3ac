//! Listener interface driven by a walk over the declaration tree.
//!
//! [`walk`] visits a [`CompilationUnitDecl`] in source order and calls the
//! matching enter/exit callbacks. Every callback has an empty default, so an
//! implementation only overrides what it needs.

use crate::ast::{
    ClassDecl, CompilationUnitDecl, ConstructorDecl, Declaration, DelegateDecl, EnumDecl,
    EnumMemberDecl, EventDecl, FieldDecl, InterfaceDecl, MemberDecl, MethodDecl, NamespaceDecl,
    NamespaceMember, PropertyDecl, StructDecl,
};

#[allow(unused_variables)]
pub trait DeclarationListener {
    fn enter_compilation_unit(&mut self, unit: &CompilationUnitDecl) {}
    fn exit_compilation_unit(&mut self, unit: &CompilationUnitDecl) {}

    fn enter_namespace(&mut self, decl: &NamespaceDecl) {}
    fn exit_namespace(&mut self, decl: &NamespaceDecl) {}

    fn enter_class(&mut self, decl: &ClassDecl) {}
    fn exit_class(&mut self, decl: &ClassDecl) {}

    fn enter_interface(&mut self, decl: &InterfaceDecl) {}
    fn exit_interface(&mut self, decl: &InterfaceDecl) {}

    fn enter_struct(&mut self, decl: &StructDecl) {}
    fn exit_struct(&mut self, decl: &StructDecl) {}

    fn enter_enum(&mut self, decl: &EnumDecl) {}
    fn exit_enum(&mut self, decl: &EnumDecl) {}

    fn enter_delegate(&mut self, decl: &DelegateDecl) {}
    fn exit_delegate(&mut self, decl: &DelegateDecl) {}

    fn enter_enum_member(&mut self, decl: &EnumMemberDecl) {}
    fn enter_field(&mut self, decl: &FieldDecl) {}
    fn enter_method(&mut self, decl: &MethodDecl) {}
    fn enter_property(&mut self, decl: &PropertyDecl) {}
    fn enter_event(&mut self, decl: &EventDecl) {}
    fn enter_constructor(&mut self, decl: &ConstructorDecl) {}
}

/// Drive `listener` over `unit` in source order.
pub fn walk<L: DeclarationListener + ?Sized>(unit: &CompilationUnitDecl, listener: &mut L) {
    listener.enter_compilation_unit(unit);
    for ns in &unit.namespaces {
        walk_namespace(ns, listener);
    }
    listener.exit_compilation_unit(unit);
}

fn walk_namespace<L: DeclarationListener + ?Sized>(ns: &NamespaceDecl, listener: &mut L) {
    listener.enter_namespace(ns);
    for member in &ns.members {
        match member {
            NamespaceMember::Declaration(decl) => walk_declaration(decl, listener),
            NamespaceMember::Namespace(child) => walk_namespace(child, listener),
        }
    }
    listener.exit_namespace(ns);
}

fn walk_declaration<L: DeclarationListener + ?Sized>(decl: &Declaration, listener: &mut L) {
    match decl {
        Declaration::Class(class) => {
            listener.enter_class(class);
            walk_members(&class.members, listener);
            listener.exit_class(class);
        }
        Declaration::Interface(interface) => {
            listener.enter_interface(interface);
            walk_members(&interface.members, listener);
            listener.exit_interface(interface);
        }
        Declaration::Struct(st) => {
            listener.enter_struct(st);
            for field in &st.fields {
                listener.enter_field(field);
            }
            listener.exit_struct(st);
        }
        Declaration::Enum(en) => {
            listener.enter_enum(en);
            for member in &en.members {
                listener.enter_enum_member(member);
            }
            listener.exit_enum(en);
        }
        Declaration::Delegate(delegate) => {
            listener.enter_delegate(delegate);
            listener.exit_delegate(delegate);
        }
    }
}

fn walk_members<L: DeclarationListener + ?Sized>(members: &[MemberDecl], listener: &mut L) {
    for member in members {
        match member {
            MemberDecl::Method(m) => listener.enter_method(m),
            MemberDecl::Property(p) => listener.enter_property(p),
            MemberDecl::Event(e) => listener.enter_event(e),
            MemberDecl::Constructor(c) => listener.enter_constructor(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl DeclarationListener for Recorder {
        fn enter_namespace(&mut self, decl: &NamespaceDecl) {
            self.events.push(format!("+ns {}", decl.name));
        }
        fn exit_namespace(&mut self, decl: &NamespaceDecl) {
            self.events.push(format!("-ns {}", decl.name));
        }
        fn enter_class(&mut self, decl: &ClassDecl) {
            self.events.push(format!("+class {}", decl.name));
        }
        fn exit_class(&mut self, decl: &ClassDecl) {
            self.events.push(format!("-class {}", decl.name));
        }
        fn enter_method(&mut self, decl: &MethodDecl) {
            self.events.push(format!("method {}", decl.name));
        }
        fn enter_property(&mut self, decl: &PropertyDecl) {
            self.events.push(format!("property {}", decl.name));
        }
        fn enter_enum_member(&mut self, decl: &EnumMemberDecl) {
            self.events.push(format!("member {}", decl.name));
        }
    }

    #[test]
    fn walks_in_source_order() {
        let unit = CompilationUnitDecl::new().with_namespace(
            NamespaceDecl::new("N", 1)
                .with(
                    ClassDecl::new("C", 2)
                        .with(MethodDecl::new("A", 3))
                        .with(PropertyDecl::new("P", 4, "Int32"))
                        .with(MethodDecl::new("B", 5)),
                )
                .with(EnumDecl::new("E", 6).member("X", 7, None))
                .with_namespace(NamespaceDecl::new("Inner", 8)),
        );

        let mut recorder = Recorder::default();
        walk(&unit, &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "+ns N",
                "+class C",
                "method A",
                "property P",
                "method B",
                "-class C",
                "member X",
                "+ns Inner",
                "-ns Inner",
                "-ns N",
            ]
        );
    }

    #[test]
    fn nested_namespace_keeps_its_place_among_declarations() {
        let ns = NamespaceDecl::new("N", 1)
            .with(ClassDecl::new("A", 2))
            .with_namespace(NamespaceDecl::new("Inner", 3).with(ClassDecl::new("B", 4)))
            .with(ClassDecl::new("C", 6));
        assert_eq!(ns.declarations().map(Declaration::name).collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(ns.namespaces().count(), 1);

        let mut recorder = Recorder::default();
        walk(&CompilationUnitDecl::new().with_namespace(ns), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "+ns N",
                "+class A",
                "-class A",
                "+ns Inner",
                "+class B",
                "-class B",
                "-ns Inner",
                "+class C",
                "-class C",
                "-ns N",
            ]
        );
    }
}
