//! Member-level declarations.

use xidl_core::ParameterSemantics;

/// A formal parameter as written.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub name: String,
    pub line: u32,
    pub semantics: ParameterSemantics,
    pub type_name: String,
}

impl ParameterDecl {
    pub fn new(name: impl Into<String>, line: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line,
            semantics: ParameterSemantics::In,
            type_name: type_name.into(),
        }
    }

    pub fn with_semantics(mut self, semantics: ParameterSemantics) -> Self {
        self.semantics = semantics;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    /// `None` for `void`.
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterDecl>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            is_static: false,
            return_type: None,
            parameters: Vec::new(),
        }
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let line = self.line;
        self.parameters.push(ParameterDecl::new(name, line, type_name));
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Kind keyword inside a property or event accessor body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
    /// Any other identifier the parser accepted in accessor position.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    pub line: u32,
}

impl AccessorDecl {
    pub fn new(kind: AccessorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    pub type_name: String,
    /// `None` for the implicit form, which gets both accessors.
    pub accessors: Option<Vec<AccessorDecl>>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, line: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line,
            is_static: false,
            type_name: type_name.into(),
            accessors: None,
        }
    }

    /// Add an accessor to the explicit accessor body, creating it if needed.
    pub fn with_accessor(self, kind: AccessorKind) -> Self {
        let line = self.line;
        self.accessor_at(kind, line)
    }

    /// Add an accessor written on its own line.
    pub fn accessor_at(mut self, kind: AccessorKind, line: u32) -> Self {
        self.accessors
            .get_or_insert_with(Vec::new)
            .push(AccessorDecl::new(kind, line));
        self
    }

    pub fn getter(self) -> Self {
        self.with_accessor(AccessorKind::Get)
    }

    pub fn setter(self) -> Self {
        self.with_accessor(AccessorKind::Set)
    }

    /// An explicit but empty accessor body, `{ }`.
    pub fn with_empty_body(mut self) -> Self {
        self.accessors = Some(Vec::new());
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub name: String,
    pub line: u32,
    pub is_static: bool,
    pub type_name: String,
    /// Explicit accessor body, which events do not accept.
    pub accessors: Option<Vec<AccessorDecl>>,
}

impl EventDecl {
    pub fn new(name: impl Into<String>, line: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line,
            is_static: false,
            type_name: type_name.into(),
            accessors: None,
        }
    }

    pub fn with_accessor(mut self, kind: AccessorKind) -> Self {
        let line = self.line;
        self.accessors
            .get_or_insert_with(Vec::new)
            .push(AccessorDecl::new(kind, line));
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub line: u32,
    pub parameters: Vec<ParameterDecl>,
}

impl ConstructorDecl {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            parameters: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let line = self.line;
        self.parameters.push(ParameterDecl::new(name, line, type_name));
        self
    }
}

/// A member of a class or interface body.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    Method(MethodDecl),
    Property(PropertyDecl),
    Event(EventDecl),
    Constructor(ConstructorDecl),
}

impl From<MethodDecl> for MemberDecl {
    fn from(decl: MethodDecl) -> Self {
        MemberDecl::Method(decl)
    }
}

impl From<PropertyDecl> for MemberDecl {
    fn from(decl: PropertyDecl) -> Self {
        MemberDecl::Property(decl)
    }
}

impl From<EventDecl> for MemberDecl {
    fn from(decl: EventDecl) -> Self {
        MemberDecl::Event(decl)
    }
}

impl From<ConstructorDecl> for MemberDecl {
    fn from(decl: ConstructorDecl) -> Self {
        MemberDecl::Constructor(decl)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub line: u32,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMemberDecl {
    pub name: String,
    pub line: u32,
    /// Initializer text: a literal or the name of another member.
    pub value: Option<String>,
}
