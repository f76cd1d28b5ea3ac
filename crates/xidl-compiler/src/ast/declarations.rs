//! Namespace-level declarations.

use xidl_core::{ClassModifiers, EnumBase};

use super::{EnumMemberDecl, FieldDecl, MemberDecl, ParameterDecl};

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnitDecl {
    pub namespaces: Vec<NamespaceDecl>,
    /// Syntax errors the parser reported while producing this tree.
    pub syntax_errors: usize,
}

impl CompilationUnitDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: NamespaceDecl) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn with_syntax_errors(mut self, count: usize) -> Self {
        self.syntax_errors = count;
        self
    }
}

/// One physical `namespace A.B { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    /// Dotted name relative to the enclosing namespace.
    pub name: String,
    pub line: u32,
    /// Declarations and nested namespaces, in source order.
    pub members: Vec<NamespaceMember>,
}

impl NamespaceDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            members: Vec::new(),
        }
    }

    pub fn with(mut self, declaration: impl Into<Declaration>) -> Self {
        self.members.push(NamespaceMember::Declaration(declaration.into()));
        self
    }

    pub fn with_namespace(mut self, namespace: NamespaceDecl) -> Self {
        self.members.push(NamespaceMember::Namespace(namespace));
        self
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.members.iter().filter_map(|member| match member {
            NamespaceMember::Declaration(decl) => Some(decl),
            NamespaceMember::Namespace(_) => None,
        })
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceDecl> {
        self.members.iter().filter_map(|member| match member {
            NamespaceMember::Namespace(ns) => Some(ns),
            NamespaceMember::Declaration(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceMember {
    Declaration(Declaration),
    Namespace(NamespaceDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Delegate(DelegateDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(d) => &d.name,
            Declaration::Interface(d) => &d.name,
            Declaration::Struct(d) => &d.name,
            Declaration::Enum(d) => &d.name,
            Declaration::Delegate(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub line: u32,
    pub modifiers: ClassModifiers,
    pub requires: Vec<String>,
    pub members: Vec<MemberDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            modifiers: ClassModifiers::empty(),
            requires: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: ClassModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn requires(mut self, interface: impl Into<String>) -> Self {
        self.requires.push(interface.into());
        self
    }

    pub fn with(mut self, member: impl Into<MemberDecl>) -> Self {
        self.members.push(member.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub line: u32,
    pub requires: Vec<String>,
    pub members: Vec<MemberDecl>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            requires: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn requires(mut self, interface: impl Into<String>) -> Self {
        self.requires.push(interface.into());
        self
    }

    pub fn with(mut self, member: impl Into<MemberDecl>) -> Self {
        self.members.push(member.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub line: u32,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, line: u32, type_name: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            line,
            type_name: type_name.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub line: u32,
    pub base: EnumBase,
    pub members: Vec<EnumMemberDecl>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            base: EnumBase::default(),
            members: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: EnumBase) -> Self {
        self.base = base;
        self
    }

    /// Add a member; `value` is literal text or another member's name.
    pub fn member(mut self, name: impl Into<String>, line: u32, value: Option<&str>) -> Self {
        self.members.push(EnumMemberDecl {
            name: name.into(),
            line,
            value: value.map(str::to_string),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegateDecl {
    pub name: String,
    pub line: u32,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterDecl>,
}

impl DelegateDecl {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
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
}

macro_rules! into_declaration {
    ($($decl:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$decl> for Declaration {
                fn from(decl: $decl) -> Self {
                    Declaration::$variant(decl)
                }
            }
        )*
    };
}

into_declaration!(
    ClassDecl => Class,
    InterfaceDecl => Interface,
    StructDecl => Struct,
    EnumDecl => Enum,
    DelegateDecl => Delegate,
);
