//! Declaration tree produced by the parser.
//!
//! The parser is an external collaborator; this tree is the contract between
//! it and the compiler. Type names are kept as written and resolved later.
//! Builder helpers make trees easy to assemble by hand in tests and tools.

mod declarations;
mod members;

pub use declarations::{
    ClassDecl, CompilationUnitDecl, Declaration, DelegateDecl, EnumDecl, InterfaceDecl,
    NamespaceDecl, NamespaceMember, StructDecl,
};
pub use members::{
    AccessorDecl, AccessorKind, ConstructorDecl, EnumMemberDecl, EventDecl, FieldDecl, MemberDecl,
    MethodDecl, ParameterDecl, PropertyDecl,
};
