//! IDL Compiler
//!
//! Semantic analysis for interface description sources, driven by a
//! declaration tree handed over by the parser.
//!
//! ## Architecture
//!
//! - **Pass 0 (Build)**: create namespaces, declarations and members
//! - **Pass 1 (Resolution)**: bind type references and compute enum values
//! - **Pass 2 (Checks)**: detect cycles, validate members, synthesize
//!   runtime class interfaces
//!
//! ## Modules
//!
//! - [`ast`]: Declaration tree, the contract with the parser
//! - [`listener`]: Enter/exit callbacks and the tree walk driving them
//! - [`context`]: Compilation context and per-compilation configuration
//! - [`passes`]: The passes themselves
//! - [`driver`]: Runs the passes in order

pub mod ast;
pub mod context;
pub mod driver;
pub mod listener;
pub mod passes;

pub use context::{CompilationContext, CompilerConfig};
pub use driver::{Compilation, Compiler};
pub use listener::{DeclarationListener, walk};
pub use passes::{BuildPass, ResolutionPass};

// Re-export the diagnostics types for convenience
pub use xidl_core::{Diagnostic, Diagnostics, ErrorKind};
