//! Semantic analysis for interface description sources.
//!
//! The parser hands over a declaration tree ([`ast::CompilationUnitDecl`]);
//! a [`Session`] resolves it against imported metadata, checks it and
//! returns a [`Compilation`] holding the type model and every diagnostic.
//!
//! ```rust
//! use xidl::CompilerOptions;
//! use xidl::ast::{CompilationUnitDecl, NamespaceDecl, StructDecl};
//!
//! let unit = CompilationUnitDecl::new().with_namespace(
//!     NamespaceDecl::new("Geometry", 1)
//!         .with(StructDecl::new("Point", 2).field("X", 3, "Double").field("Y", 4, "Double")),
//! );
//!
//! let session = CompilerOptions::new().with_assembly_name("Geometry").build().unwrap();
//! let compilation = session.compile(&unit);
//! assert!(!compilation.has_errors());
//! assert!(compilation.find_struct("Geometry.Point").is_some());
//! ```

mod logging;
mod options;
mod session;

pub use logging::{LOG_ENV, LogFormat, init_tracing};
pub use options::CompilerOptions;
pub use session::{Session, SessionError};

pub use xidl_compiler::{Compilation, Compiler, CompilerConfig, ast};
pub use xidl_core::{Diagnostic, Diagnostics, ErrorKind, MetadataError};
pub use xidl_registry::{
    ManifestSource, MetadataCache, MetadataDatabase, MetadataSource, SymbolTable, TypeModel,
};

/// Entity types, qualified names and type hashes.
pub mod core {
    pub use xidl_core::*;
}

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::{Compilation, CompilerOptions, Diagnostics, ErrorKind, Session};
}
