//! CompilationContext - state shared by every pass of one compilation.

use std::sync::Arc;

use xidl_core::Diagnostics;
use xidl_registry::{MetadataCache, SymbolTable, TypeModel};

/// Per-compilation switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Assembly recorded on every declaration.
    pub assembly_name: String,
    /// Run the member conflict validator.
    pub validate_members: bool,
    /// Synthesize default, statics and factory interfaces for classes.
    pub synthesize_runtimeclasses: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            assembly_name: "default".to_string(),
            validate_members: true,
            synthesize_runtimeclasses: true,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assembly_name(mut self, name: impl Into<String>) -> Self {
        self.assembly_name = name.into();
        self
    }

    pub fn with_member_validation(mut self, enabled: bool) -> Self {
        self.validate_members = enabled;
        self
    }

    pub fn with_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_runtimeclasses = enabled;
        self
    }
}

/// Type model, symbol table and diagnostics for one compilation.
///
/// Passes borrow the context mutably one at a time; no pass observes another
/// pass half-way through.
#[derive(Debug, Default)]
pub struct CompilationContext {
    pub config: CompilerConfig,
    pub model: TypeModel,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
}

impl CompilationContext {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A context whose symbol table reads through to imported metadata.
    pub fn with_metadata(config: CompilerConfig, cache: Arc<MetadataCache>) -> Self {
        Self {
            config,
            symbols: SymbolTable::with_cache(cache),
            ..Self::default()
        }
    }
}
