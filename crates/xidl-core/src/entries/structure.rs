//! Struct and delegate declarations.

use crate::QualifiedName;

use super::{CycleState, FormalParameterModel, TypeRef};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldModel {
    pub name: String,
    pub line: u32,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructModel {
    pub name: String,
    pub namespace: String,
    pub line: u32,
    pub assembly: String,
    pub fields: Vec<FieldModel>,
    pub cycle: CycleState,
}

impl StructModel {
    pub fn new(
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
            fields: Vec::new(),
            cycle: CycleState::Unknown,
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::in_namespace(&self.namespace, self.name.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegateModel {
    pub name: String,
    pub namespace: String,
    pub line: u32,
    pub assembly: String,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<FormalParameterModel>,
}

impl DelegateModel {
    pub fn new(
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
            return_type: None,
            parameters: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::in_namespace(&self.namespace, self.name.as_str())
    }

    pub fn type_refs_mut(&mut self) -> impl Iterator<Item = &mut TypeRef> {
        self.return_type
            .iter_mut()
            .chain(self.parameters.iter_mut().map(|p| &mut p.type_ref))
    }
}
