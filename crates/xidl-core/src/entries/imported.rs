//! Types materialized from imported metadata.

use std::fmt;

use crate::EnumBase;

/// Category of an imported declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportedCategory {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

impl ImportedCategory {
    /// Keyword used in metadata manifests.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
        }
    }

    /// Parse a manifest keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" | "runtimeclass" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            "delegate" => Some(Self::Delegate),
            _ => None,
        }
    }
}

impl fmt::Display for ImportedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A declaration read from an imported metadata container.
///
/// Imported types are opaque to the compiler: they can be referenced and
/// required, but contribute no members to inheritance checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedType {
    /// Dotted qualified name.
    pub qualified_name: String,
    pub category: ImportedCategory,
    /// Underlying type, for enums.
    pub underlying: Option<EnumBase>,
    /// Name of the container the declaration came from.
    pub source: String,
}

impl ImportedType {
    pub fn new(
        qualified_name: impl Into<String>,
        category: ImportedCategory,
        source: impl Into<String>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            category,
            underlying: None,
            source: source.into(),
        }
    }

    /// Set the enum underlying type.
    pub fn with_underlying(mut self, underlying: EnumBase) -> Self {
        self.underlying = Some(underlying);
        self
    }
}
