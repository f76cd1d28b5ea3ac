//! Lazily resolved type references.

use crate::{FundamentalType, OBJECT_KEYWORD, TypeHash};

use super::{DelegateId, EnumId, ImportedCategory, ImportedTypeId, ObjectId, StructId};

/// What the symbol table knows a qualified name to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Class(ObjectId),
    Interface(ObjectId),
    Struct(StructId),
    Enum(EnumId),
    Delegate(DelegateId),
    Imported(ImportedTypeId, ImportedCategory),
}

impl TypeCategory {
    /// True for local and imported interfaces.
    pub fn is_interface(self) -> bool {
        matches!(
            self,
            TypeCategory::Interface(_) | TypeCategory::Imported(_, ImportedCategory::Interface)
        )
    }

    /// True for local and imported delegates.
    pub fn is_delegate(self) -> bool {
        matches!(
            self,
            TypeCategory::Delegate(_) | TypeCategory::Imported(_, ImportedCategory::Delegate)
        )
    }

    /// Short category name for logs.
    pub fn kind_name(self) -> &'static str {
        match self {
            TypeCategory::Class(_) => "class",
            TypeCategory::Interface(_) => "interface",
            TypeCategory::Struct(_) => "struct",
            TypeCategory::Enum(_) => "enum",
            TypeCategory::Delegate(_) => "delegate",
            TypeCategory::Imported(_, category) => category.keyword(),
        }
    }
}

/// The declaration or built-in type a resolved [`TypeRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTarget {
    Class(ObjectId),
    Interface(ObjectId),
    Struct(StructId),
    Enum(EnumId),
    Delegate(DelegateId),
    Fundamental(FundamentalType),
    Object,
    Imported(ImportedTypeId),
}

impl TypeTarget {
    /// Identity hash: equal for every reference to the same target.
    pub fn identity(self) -> TypeHash {
        match self {
            TypeTarget::Class(id) => TypeHash::from_entity(1, id.0),
            TypeTarget::Interface(id) => TypeHash::from_entity(2, id.0),
            TypeTarget::Struct(id) => TypeHash::from_entity(3, id.0),
            TypeTarget::Enum(id) => TypeHash::from_entity(4, id.0),
            TypeTarget::Delegate(id) => TypeHash::from_entity(5, id.0),
            TypeTarget::Imported(id) => TypeHash::from_entity(6, id.0),
            TypeTarget::Fundamental(ty) => ty.type_hash(),
            TypeTarget::Object => TypeHash::from_name(OBJECT_KEYWORD),
        }
    }

    /// The interface handle, if this target is a local interface.
    pub fn as_interface(self) -> Option<ObjectId> {
        match self {
            TypeTarget::Interface(id) => Some(id),
            _ => None,
        }
    }

    /// The struct handle, if this target is a local struct.
    pub fn as_struct(self) -> Option<StructId> {
        match self {
            TypeTarget::Struct(id) => Some(id),
            _ => None,
        }
    }
}

impl From<TypeCategory> for TypeTarget {
    fn from(category: TypeCategory) -> Self {
        match category {
            TypeCategory::Class(id) => TypeTarget::Class(id),
            TypeCategory::Interface(id) => TypeTarget::Interface(id),
            TypeCategory::Struct(id) => TypeTarget::Struct(id),
            TypeCategory::Enum(id) => TypeTarget::Enum(id),
            TypeCategory::Delegate(id) => TypeTarget::Delegate(id),
            TypeCategory::Imported(id, _) => TypeTarget::Imported(id),
        }
    }
}

/// A reference to a type by name that is resolved in a later pass.
///
/// Equality follows the state: two unresolved references are equal when
/// their names are, two resolved references when their targets are, and an
/// unresolved reference never equals a resolved one.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// Name as written, not yet looked up.
    Unresolved { name: String },
    /// Looked up; `name` keeps the spelling for messages and generators.
    Resolved { name: String, target: TypeTarget },
}

impl TypeRef {
    /// An unresolved reference to `name`.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Unresolved { name: name.into() }
    }

    /// A reference to a fundamental type; these never need lookup.
    pub fn fundamental(ty: FundamentalType) -> Self {
        TypeRef::Resolved {
            name: ty.keyword().to_string(),
            target: TypeTarget::Fundamental(ty),
        }
    }

    /// A reference to the opaque object type.
    pub fn object() -> Self {
        TypeRef::Resolved {
            name: OBJECT_KEYWORD.to_string(),
            target: TypeTarget::Object,
        }
    }

    /// An already-resolved reference.
    pub fn resolved(name: impl Into<String>, target: TypeTarget) -> Self {
        TypeRef::Resolved {
            name: name.into(),
            target,
        }
    }

    /// Parse a written type name: fundamental keywords and `Object` resolve
    /// immediately, anything else stays unresolved.
    pub fn parse(name: &str) -> Self {
        if let Some(ty) = FundamentalType::from_keyword(name) {
            Self::fundamental(ty)
        } else if name == OBJECT_KEYWORD {
            Self::object()
        } else {
            Self::named(name)
        }
    }

    /// The name as written.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Unresolved { name } | TypeRef::Resolved { name, .. } => name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeRef::Resolved { .. })
    }

    /// The resolved target, if any.
    pub fn target(&self) -> Option<TypeTarget> {
        match self {
            TypeRef::Resolved { target, .. } => Some(*target),
            TypeRef::Unresolved { .. } => None,
        }
    }

    /// Transition to the resolved state. Already-resolved references keep their target.
    pub fn resolve(&mut self, target: TypeTarget) {
        if let TypeRef::Unresolved { name } = self {
            let name = std::mem::take(name);
            *self = TypeRef::Resolved { name, target };
        }
    }

    /// Identity hash used for signature comparison.
    pub fn identity(&self) -> TypeHash {
        match self {
            TypeRef::Resolved { target, .. } => target.identity(),
            TypeRef::Unresolved { name } => TypeHash::from_name(name),
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeRef::Unresolved { name: a }, TypeRef::Unresolved { name: b }) => a == b,
            (TypeRef::Resolved { target: a, .. }, TypeRef::Resolved { target: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeRef {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_equality_compares_names() {
        assert_eq!(TypeRef::named("Point"), TypeRef::named("Point"));
        assert_ne!(TypeRef::named("Point"), TypeRef::named("N.Point"));
    }

    #[test]
    fn resolved_equality_compares_targets() {
        let a = TypeRef::resolved("Point", TypeTarget::Struct(StructId(0)));
        let b = TypeRef::resolved("N.Point", TypeTarget::Struct(StructId(0)));
        let c = TypeRef::resolved("Point", TypeTarget::Struct(StructId(1)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn mixed_states_are_unequal() {
        let resolved = TypeRef::resolved("Point", TypeTarget::Struct(StructId(0)));
        assert_ne!(resolved, TypeRef::named("Point"));
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut r = TypeRef::named("Point");
        r.resolve(TypeTarget::Struct(StructId(3)));
        r.resolve(TypeTarget::Struct(StructId(9)));
        assert_eq!(r.target(), Some(TypeTarget::Struct(StructId(3))));
        assert_eq!(r.name(), "Point");
    }

    #[test]
    fn parse_fundamentals_resolve_immediately() {
        assert_eq!(
            TypeRef::parse("Int32").target(),
            Some(TypeTarget::Fundamental(FundamentalType::Int32))
        );
        assert_eq!(TypeRef::parse("Object").target(), Some(TypeTarget::Object));
        assert!(!TypeRef::parse("Widget").is_resolved());
    }

    #[test]
    fn identity_follows_target_not_spelling() {
        let a = TypeRef::resolved("Point", TypeTarget::Struct(StructId(0)));
        let b = TypeRef::resolved("N.Point", TypeTarget::Struct(StructId(0)));
        assert_eq!(a.identity(), b.identity());
        assert_ne!(
            TypeTarget::Class(ObjectId(0)).identity(),
            TypeTarget::Interface(ObjectId(0)).identity()
        );
    }

    #[test]
    fn category_predicates() {
        assert!(TypeCategory::Interface(ObjectId(0)).is_interface());
        assert!(TypeCategory::Imported(ImportedTypeId(0), ImportedCategory::Interface).is_interface());
        assert!(!TypeCategory::Class(ObjectId(0)).is_interface());
        assert!(TypeCategory::Imported(ImportedTypeId(0), ImportedCategory::Delegate).is_delegate());
    }
}
