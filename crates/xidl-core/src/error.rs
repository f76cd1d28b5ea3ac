//! Error types for the IDL compiler.
//!
//! Semantic problems are never returned as `Err`: they are recorded as
//! [`Diagnostic`]s in a [`crate::Diagnostics`] sink so one run surfaces as many
//! independent problems as possible. Only the metadata boundary, which touches
//! files, returns `Result` with [`MetadataError`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Semantic error taxonomy
// ============================================================================

/// Kind of a semantic diagnostic.
///
/// Displays as the upper-case identifier used in compiler output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A type reference names nothing in the symbol table.
    UnresolvedType,
    /// Two declarations share a simple name within one namespace.
    DuplicateNamespaceMember,
    /// Two members of a type share a name illegally.
    DuplicateTypeMemberId,
    /// Two struct fields share a name.
    DuplicateFieldId,
    /// An enum member's value depends on itself.
    CircularEnumField,
    /// A struct contains itself by value.
    CircularStructField,
    /// An interface requires itself, directly or transitively.
    CircularInterfaceInheritance,
    /// An enum member's value does not fit the enum's underlying type.
    EnumFieldOutOfRange,
    /// A property accessor body is malformed.
    InvalidPropertyAccessor,
    /// A property accessor is declared twice.
    DuplicatePropertyAccessor,
    /// A property re-declaration supplies an accessor that already exists.
    InvalidOrDuplicatePropertyAccessor,
    /// An event accessor collides with a user method or body.
    ConflictingEventAccessorMethods,
    /// Two methods share a name and parameter list.
    CannotOverloadMethod,
    /// A member collides with an inherited member of a different kind.
    ConflictingInheritanceMember,
    /// A static-only class declares an instance member.
    StaticMemberOnly,
    /// A requires clause names something that is not an interface.
    TypeNotInterface,
    /// An event type is not a delegate.
    TypeNotDelegate,
    /// Two sibling namespaces differ only by letter case.
    NamespaceCaseConflict,
}

impl ErrorKind {
    /// The upper-case identifier of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnresolvedType => "UNRESOLVED_TYPE",
            Self::DuplicateNamespaceMember => "DUPLICATE_NAMESPACE_MEMBER",
            Self::DuplicateTypeMemberId => "DUPLICATE_TYPE_MEMBER_ID",
            Self::DuplicateFieldId => "DUPLICATE_FIELD_ID",
            Self::CircularEnumField => "CIRCULAR_ENUM_FIELD",
            Self::CircularStructField => "CIRCULAR_STRUCT_FIELD",
            Self::CircularInterfaceInheritance => "CIRCULAR_INTERFACE_INHERITANCE",
            Self::EnumFieldOutOfRange => "ENUM_FIELD_OUT_OF_RANGE",
            Self::InvalidPropertyAccessor => "INVALID_PROPERTY_ACCESSOR",
            Self::DuplicatePropertyAccessor => "DUPLICATE_PROPERTY_ACCESSOR",
            Self::InvalidOrDuplicatePropertyAccessor => "INVALID_OR_DUPLICATE_PROPERTY_ACCESSOR",
            Self::ConflictingEventAccessorMethods => "CONFLICTING_EVENT_ACCESSOR_METHODS",
            Self::CannotOverloadMethod => "CANNOT_OVERLOAD_METHOD",
            Self::ConflictingInheritanceMember => "CONFLICTING_INHERITANCE_MEMBER",
            Self::StaticMemberOnly => "STATIC_MEMBER_ONLY",
            Self::TypeNotInterface => "TYPE_NOT_INTERFACE",
            Self::TypeNotDelegate => "TYPE_NOT_DELEGATE",
            Self::NamespaceCaseConflict => "NAMESPACE_CASE_CONFLICT",
        }
    }

    /// Human-readable description used in diagnostic messages.
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnresolvedType => "unresolved type",
            Self::DuplicateNamespaceMember => "duplicate namespace member",
            Self::DuplicateTypeMemberId => "duplicate type member",
            Self::DuplicateFieldId => "duplicate struct field",
            Self::CircularEnumField => "circular enum member value",
            Self::CircularStructField => "struct contains itself",
            Self::CircularInterfaceInheritance => "interface requires itself",
            Self::EnumFieldOutOfRange => "enum member value out of range",
            Self::InvalidPropertyAccessor => "invalid property accessor",
            Self::DuplicatePropertyAccessor => "duplicate property accessor",
            Self::InvalidOrDuplicatePropertyAccessor => "invalid or duplicate property accessor",
            Self::ConflictingEventAccessorMethods => "conflicting event accessor methods",
            Self::CannotOverloadMethod => "cannot overload method",
            Self::ConflictingInheritanceMember => "conflicts with inherited member",
            Self::StaticMemberOnly => "static class may only contain static members",
            Self::TypeNotInterface => "type is not an interface",
            Self::TypeNotDelegate => "type is not a delegate",
            Self::NamespaceCaseConflict => "namespace differs from an existing namespace only by case",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded semantic diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error kind.
    pub kind: ErrorKind,
    /// Source line (1-based; 0 for declarations with no source position).
    pub line: u32,
    /// Offending symbol, qualified or simple depending on the kind.
    pub symbol: String,
    /// Rendered message.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the default message for its kind.
    pub fn new(kind: ErrorKind, line: u32, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let message = format!("{}: '{}'", kind.description(), symbol);
        Self {
            kind,
            line,
            symbol,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: error {}: {}", self.line, self.kind, self.message)
    }
}

// ============================================================================
// Metadata Errors
// ============================================================================

/// Errors loading imported type metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read metadata file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}:{line}: malformed metadata entry: {detail}")]
    Malformed {
        source_name: String,
        line: usize,
        detail: String,
    },

    #[error("{source_name}: unknown type category '{category}'")]
    UnknownCategory {
        source_name: String,
        category: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_is_upper_snake() {
        assert_eq!(ErrorKind::UnresolvedType.to_string(), "UNRESOLVED_TYPE");
        assert_eq!(
            ErrorKind::CircularInterfaceInheritance.to_string(),
            "CIRCULAR_INTERFACE_INHERITANCE"
        );
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(ErrorKind::DuplicateFieldId, 12, "x");
        assert_eq!(d.to_string(), "line 12: error DUPLICATE_FIELD_ID: duplicate struct field: 'x'");
    }

    #[test]
    fn metadata_error_display() {
        let err = MetadataError::Malformed {
            source_name: "foundation.meta".into(),
            line: 3,
            detail: "missing name".into(),
        };
        assert_eq!(
            err.to_string(),
            "foundation.meta:3: malformed metadata entry: missing name"
        );
    }
}
