//! Class and interface declarations.
//!
//! Both kinds share [`ClassOrInterfaceModel`]: a requires list and ordered
//! member lists. Class-only data (modifiers, constructors, synthesized
//! interfaces) lives in [`ClassData`].

use bitflags::bitflags;

use crate::QualifiedName;

use super::{EventModel, FormalParameterModel, MethodModel, ObjectId, PropertyModel, TypeRef};

bitflags! {
    /// Modifiers on a class declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassModifiers: u8 {
        const SEALED = 0b01;
        /// Static-only: every member must be static.
        const STATIC = 0b10;
    }
}

/// Memoized result of a cycle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CycleState {
    #[default]
    Unknown,
    Clear,
    Circular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorModel {
    pub line: u32,
    pub parameters: Vec<FormalParameterModel>,
}

impl ConstructorModel {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: FormalParameterModel) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Interfaces generated from a class's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SynthesizedInterfaces {
    /// `I<Name>`, the default instance interface.
    pub default: Option<ObjectId>,
    /// `I<Name>Statics`.
    pub statics: Option<ObjectId>,
    /// `I<Name>Factory`.
    pub factory: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassData {
    pub modifiers: ClassModifiers,
    pub constructors: Vec<ConstructorModel>,
    pub synthesized: SynthesizedInterfaces,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Class(ClassData),
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassOrInterfaceModel {
    pub name: String,
    /// Dotted name of the containing namespace.
    pub namespace: String,
    pub line: u32,
    pub assembly: String,
    pub kind: ObjectKind,
    /// Base interfaces, in declaration order.
    pub requires: Vec<TypeRef>,
    /// Methods in declaration order, synthesized accessors included.
    pub methods: Vec<MethodModel>,
    pub properties: Vec<PropertyModel>,
    pub events: Vec<EventModel>,
    pub cycle: CycleState,
    /// Class this interface was synthesized from.
    pub synthesized_from: Option<ObjectId>,
}

impl ClassOrInterfaceModel {
    fn with_kind(
        kind: ObjectKind,
        name: impl Into<String>,
        namespace: impl Into<String>,
        line: u32,
        assembly: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            line,
            assembly: assembly.into(),
            kind,
            requires: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            cycle: CycleState::Unknown,
            synthesized_from: None,
        }
    }

    pub fn new_interface(
        name: impl Into<String>,
        namespace: impl Into<String>,
        line: u32,
        assembly: impl Into<String>,
    ) -> Self {
        Self::with_kind(ObjectKind::Interface, name, namespace, line, assembly)
    }

    pub fn new_class(
        name: impl Into<String>,
        namespace: impl Into<String>,
        line: u32,
        assembly: impl Into<String>,
        modifiers: ClassModifiers,
    ) -> Self {
        let data = ClassData {
            modifiers,
            ..ClassData::default()
        };
        Self::with_kind(ObjectKind::Class(data), name, namespace, line, assembly)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, ObjectKind::Class(_))
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ObjectKind::Interface)
    }

    pub fn class_data(&self) -> Option<&ClassData> {
        match &self.kind {
            ObjectKind::Class(data) => Some(data),
            ObjectKind::Interface => None,
        }
    }

    pub fn class_data_mut(&mut self) -> Option<&mut ClassData> {
        match &mut self.kind {
            ObjectKind::Class(data) => Some(data),
            ObjectKind::Interface => None,
        }
    }

    /// True for classes marked `static`.
    pub fn is_static_only(&self) -> bool {
        self.class_data()
            .is_some_and(|c| c.modifiers.contains(ClassModifiers::STATIC))
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::in_namespace(&self.namespace, self.name.as_str())
    }

    /// Append a method, returning its index.
    pub fn add_method(&mut self, method: MethodModel) -> usize {
        self.methods.push(method);
        self.methods.len() - 1
    }

    pub fn find_property(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    pub fn find_event(&self, name: &str) -> Option<usize> {
        self.events.iter().position(|e| e.name == name)
    }

    /// Iterate every type reference held by the declaration and its members.
    pub fn type_refs_mut(&mut self) -> impl Iterator<Item = &mut TypeRef> {
        let constructors: &mut [ConstructorModel] = match &mut self.kind {
            ObjectKind::Class(data) => data.constructors.as_mut_slice(),
            ObjectKind::Interface => Default::default(),
        };
        self.methods
            .iter_mut()
            .flat_map(MethodModel::type_refs_mut)
            .chain(self.properties.iter_mut().map(|p| &mut p.type_ref))
            .chain(self.events.iter_mut().map(|e| &mut e.type_ref))
            .chain(
                constructors
                    .iter_mut()
                    .flat_map(|c| c.parameters.iter_mut().map(|p| &mut p.type_ref)),
            )
    }
}
