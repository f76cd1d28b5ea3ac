//! Enum declarations.

use crate::{EnumBase, EnumValue, QualifiedName};

/// Value state of an enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumMemberValue {
    /// No initializer: zero for the first member, else previous plus one.
    Implicit,
    /// Decimal or `0x` hexadecimal literal text.
    Literal(String),
    /// Name of another member of the same enum.
    Reference(String),
    Resolved(EnumValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub line: u32,
    pub value: EnumMemberValue,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, line: u32, value: EnumMemberValue) -> Self {
        Self {
            name: name.into(),
            line,
            value,
        }
    }

    /// The computed value, once resolved.
    pub fn resolved_value(&self) -> Option<EnumValue> {
        match self.value {
            EnumMemberValue::Resolved(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    pub name: String,
    pub namespace: String,
    pub line: u32,
    pub assembly: String,
    pub base: EnumBase,
    pub members: Vec<EnumMember>,
}

impl EnumModel {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        line: u32,
        assembly: impl Into<String>,
        base: EnumBase,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            line,
            assembly: assembly.into(),
            base,
            members: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::in_namespace(&self.namespace, self.name.as_str())
    }

    pub fn find_member(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    /// Value of the named member, once resolved.
    pub fn value_of(&self, name: &str) -> Option<EnumValue> {
        self.find_member(name)
            .and_then(|i| self.members[i].resolved_value())
    }

    /// True once every member carries a value.
    pub fn is_fully_resolved(&self) -> bool {
        self.members.iter().all(|m| m.resolved_value().is_some())
    }
}
