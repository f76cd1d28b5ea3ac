//! The type model: arenas of declarations plus the namespace tree that names them.

use xidl_core::{
    ClassOrInterfaceModel, DelegateId, DelegateModel, EnumId, EnumModel, ObjectId, QualifiedName,
    StructId, StructModel, TypeCategory,
};

use crate::NamespaceTree;

/// Owner of every declaration in a compilation.
///
/// Declarations are created once while the declaration tree is walked and
/// then mutated in place by later passes. Nothing is removed until the whole
/// model is dropped.
#[derive(Debug, Default)]
pub struct TypeModel {
    namespaces: NamespaceTree,
    objects: Vec<ClassOrInterfaceModel>,
    structs: Vec<StructModel>,
    enums: Vec<EnumModel>,
    delegates: Vec<DelegateModel>,
}

impl TypeModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Namespaces
    // ==========================================================================

    pub fn namespaces(&self) -> &NamespaceTree {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceTree {
        &mut self.namespaces
    }

    /// Find a declaration by dotted qualified name.
    pub fn lookup(&self, qualified: &str) -> Option<TypeCategory> {
        let name = QualifiedName::from_qualified_string(qualified);
        let ns = self.namespaces.get_path(name.namespace_path())?;
        self.namespaces.lookup_member(ns, name.simple_name())
    }

    // ==========================================================================
    // Arena insertion
    // ==========================================================================

    pub fn add_object(&mut self, model: ClassOrInterfaceModel) -> ObjectId {
        self.objects.push(model);
        ObjectId::from_index(self.objects.len() - 1)
    }

    pub fn add_struct(&mut self, model: StructModel) -> StructId {
        self.structs.push(model);
        StructId::from_index(self.structs.len() - 1)
    }

    pub fn add_enum(&mut self, model: EnumModel) -> EnumId {
        self.enums.push(model);
        EnumId::from_index(self.enums.len() - 1)
    }

    pub fn add_delegate(&mut self, model: DelegateModel) -> DelegateId {
        self.delegates.push(model);
        DelegateId::from_index(self.delegates.len() - 1)
    }

    // ==========================================================================
    // Access by handle
    // ==========================================================================

    pub fn object(&self, id: ObjectId) -> &ClassOrInterfaceModel {
        &self.objects[id.index()]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut ClassOrInterfaceModel {
        &mut self.objects[id.index()]
    }

    pub fn structure(&self, id: StructId) -> &StructModel {
        &self.structs[id.index()]
    }

    pub fn structure_mut(&mut self, id: StructId) -> &mut StructModel {
        &mut self.structs[id.index()]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumModel {
        &self.enums[id.index()]
    }

    pub fn enumeration_mut(&mut self, id: EnumId) -> &mut EnumModel {
        &mut self.enums[id.index()]
    }

    pub fn delegate(&self, id: DelegateId) -> &DelegateModel {
        &self.delegates[id.index()]
    }

    pub fn delegate_mut(&mut self, id: DelegateId) -> &mut DelegateModel {
        &mut self.delegates[id.index()]
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + use<> {
        (0..self.objects.len()).map(ObjectId::from_index)
    }

    pub fn struct_ids(&self) -> impl Iterator<Item = StructId> + use<> {
        (0..self.structs.len()).map(StructId::from_index)
    }

    pub fn enum_ids(&self) -> impl Iterator<Item = EnumId> + use<> {
        (0..self.enums.len()).map(EnumId::from_index)
    }

    pub fn delegate_ids(&self) -> impl Iterator<Item = DelegateId> + use<> {
        (0..self.delegates.len()).map(DelegateId::from_index)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ClassOrInterfaceModel)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, m)| (ObjectId::from_index(i), m))
    }

    pub fn structs(&self) -> impl Iterator<Item = (StructId, &StructModel)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(i, m)| (StructId::from_index(i), m))
    }

    pub fn enums(&self) -> impl Iterator<Item = (EnumId, &EnumModel)> {
        self.enums
            .iter()
            .enumerate()
            .map(|(i, m)| (EnumId::from_index(i), m))
    }

    pub fn delegates(&self) -> impl Iterator<Item = (DelegateId, &DelegateModel)> {
        self.delegates
            .iter()
            .enumerate()
            .map(|(i, m)| (DelegateId::from_index(i), m))
    }

    // ==========================================================================
    // Lookup by name
    // ==========================================================================

    pub fn find_class(&self, qualified: &str) -> Option<&ClassOrInterfaceModel> {
        match self.lookup(qualified)? {
            TypeCategory::Class(id) => Some(self.object(id)),
            _ => None,
        }
    }

    pub fn find_interface(&self, qualified: &str) -> Option<&ClassOrInterfaceModel> {
        match self.lookup(qualified)? {
            TypeCategory::Interface(id) => Some(self.object(id)),
            _ => None,
        }
    }

    pub fn find_struct(&self, qualified: &str) -> Option<&StructModel> {
        match self.lookup(qualified)? {
            TypeCategory::Struct(id) => Some(self.structure(id)),
            _ => None,
        }
    }

    pub fn find_enum(&self, qualified: &str) -> Option<&EnumModel> {
        match self.lookup(qualified)? {
            TypeCategory::Enum(id) => Some(self.enumeration(id)),
            _ => None,
        }
    }

    pub fn find_delegate(&self, qualified: &str) -> Option<&DelegateModel> {
        match self.lookup(qualified)? {
            TypeCategory::Delegate(id) => Some(self.delegate(id)),
            _ => None,
        }
    }

    /// Total number of declarations of every kind.
    pub fn declaration_count(&self) -> usize {
        self.objects.len() + self.structs.len() + self.enums.len() + self.delegates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidl_core::{ClassModifiers, EnumBase};

    fn register(model: &mut TypeModel, ns: &[&str], name: &str, category: TypeCategory) {
        let tree = model.namespaces_mut();
        let node = tree.get_or_create_path(ns);
        let body = tree.open_body(node, 1);
        tree.add_member(node, body, name, category).unwrap();
    }

    #[test]
    fn handles_address_arena_slots() {
        let mut model = TypeModel::new();
        let a = model.add_struct(StructModel::new("A", "N", 1, "asm"));
        let b = model.add_struct(StructModel::new("B", "N", 2, "asm"));
        assert_eq!(model.structure(a).name, "A");
        assert_eq!(model.structure(b).name, "B");
        assert_eq!(model.struct_ids().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn find_by_qualified_name() {
        let mut model = TypeModel::new();
        let id = model.add_object(ClassOrInterfaceModel::new_class(
            "Widget",
            "UI.Controls",
            4,
            "asm",
            ClassModifiers::empty(),
        ));
        register(&mut model, &["UI", "Controls"], "Widget", TypeCategory::Class(id));
        let e = model.add_enum(EnumModel::new("Mode", "UI", 8, "asm", EnumBase::Int32));
        register(&mut model, &["UI"], "Mode", TypeCategory::Enum(e));

        assert_eq!(model.find_class("UI.Controls.Widget").map(|c| c.line), Some(4));
        assert!(model.find_interface("UI.Controls.Widget").is_none());
        assert_eq!(model.find_enum("UI.Mode").map(|e| e.line), Some(8));
        assert!(model.lookup("UI.Missing").is_none());
        assert_eq!(model.declaration_count(), 2);
    }
}
