//! The compiler driver: runs every pass over one compilation unit in order.

use std::sync::Arc;

use xidl_core::{ClassOrInterfaceModel, DelegateModel, Diagnostics, EnumModel, StructModel};
use xidl_registry::{MetadataCache, SymbolTable, TypeModel};

use crate::ast::CompilationUnitDecl;
use crate::context::{CompilationContext, CompilerConfig};
use crate::passes::{
    BuildPass, CycleDetectionPass, EnumValuePass, MemberValidationPass, ResolutionPass,
    SynthesisPass,
};

/// Result of compilation.
#[derive(Debug)]
pub struct Compilation {
    /// The finished type model.
    pub model: TypeModel,
    /// Every name known to the compilation, local and imported.
    pub symbols: SymbolTable,
    /// Syntax and semantic errors.
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Check if compilation reported any error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn find_class(&self, qualified: &str) -> Option<&ClassOrInterfaceModel> {
        self.model.find_class(qualified)
    }

    pub fn find_interface(&self, qualified: &str) -> Option<&ClassOrInterfaceModel> {
        self.model.find_interface(qualified)
    }

    pub fn find_struct(&self, qualified: &str) -> Option<&StructModel> {
        self.model.find_struct(qualified)
    }

    pub fn find_enum(&self, qualified: &str) -> Option<&EnumModel> {
        self.model.find_enum(qualified)
    }

    pub fn find_delegate(&self, qualified: &str) -> Option<&DelegateModel> {
        self.model.find_delegate(qualified)
    }
}

impl From<CompilationContext> for Compilation {
    fn from(ctx: CompilationContext) -> Self {
        Self {
            model: ctx.model,
            symbols: ctx.symbols,
            diagnostics: ctx.diagnostics,
        }
    }
}

/// The main compiler entry point.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
    metadata: Option<Arc<MetadataCache>>,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            metadata: None,
        }
    }

    /// Resolve names the unit does not declare against `cache`.
    pub fn with_metadata(mut self, cache: Arc<MetadataCache>) -> Self {
        self.metadata = Some(cache);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a declaration tree.
    ///
    /// Syntax errors recorded on the unit are counted and stop compilation
    /// before any semantic pass runs.
    #[tracing::instrument(skip_all, fields(assembly = %self.config.assembly_name))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, unit: &CompilationUnitDecl) -> Compilation {
        let mut ctx = match &self.metadata {
            Some(cache) => CompilationContext::with_metadata(self.config.clone(), Arc::clone(cache)),
            None => CompilationContext::new(self.config.clone()),
        };

        ctx.diagnostics.add_syntax_errors(unit.syntax_errors);
        if ctx.diagnostics.syntax_error_count() > 0 {
            tracing::warn!(
                syntax_errors = ctx.diagnostics.syntax_error_count(),
                "skipping semantic analysis"
            );
            return ctx.into();
        }

        // Pass 0: build
        let built = BuildPass::new(&mut ctx).run(unit);

        // Pass 1: resolve
        let resolved = ResolutionPass::new(&mut ctx).run();
        let enums = EnumValuePass::new(&mut ctx).run();

        // Pass 2: check and synthesize
        let cycles = CycleDetectionPass::new(&mut ctx).run();
        if self.config.validate_members {
            MemberValidationPass::new(&mut ctx).run();
        }
        if self.config.synthesize_runtimeclasses {
            SynthesisPass::new(&mut ctx).run();
        }

        tracing::info!(
            declarations = built.declarations,
            resolved = resolved.resolved,
            unresolved = resolved.unresolved,
            incomplete_enums = enums.incomplete_enums,
            circular = cycles.circular_structs + cycles.circular_interfaces,
            errors = ctx.diagnostics.semantic_error_count(),
            "compilation complete"
        );
        ctx.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassDecl, EnumDecl, MethodDecl, NamespaceDecl, StructDecl};
    use xidl_core::{EnumValue, ErrorKind};

    #[test]
    fn syntax_errors_skip_semantic_passes() {
        let unit = CompilationUnitDecl::new()
            .with_syntax_errors(2)
            .with_namespace(NamespaceDecl::new("N", 1).with(StructDecl::new("S", 2).field("x", 3, "Missing")));
        let compilation = Compiler::default().compile(&unit);
        assert_eq!(compilation.diagnostics.syntax_error_count(), 2);
        assert_eq!(compilation.diagnostics.semantic_error_count(), 0);
        assert!(compilation.has_errors());
        assert!(compilation.find_struct("N.S").is_none());
    }

    #[test]
    fn full_pipeline() {
        let unit = CompilationUnitDecl::new().with_namespace(
            NamespaceDecl::new("App", 1)
                .with(EnumDecl::new("Color", 2).member("Red", 3, None).member("Green", 4, None))
                .with(ClassDecl::new("Painter", 5).with(MethodDecl::new("Paint", 6).with_param("c", "Color"))),
        );
        let compilation = Compiler::new(CompilerConfig::new().with_assembly_name("App")).compile(&unit);
        assert!(!compilation.has_errors());
        assert_eq!(
            compilation.find_enum("App.Color").and_then(|e| e.value_of("Green")),
            Some(EnumValue::Signed(1))
        );
        assert!(compilation.find_interface("App.IPainter").is_some());
        assert_eq!(compilation.find_class("App.Painter").map(|c| c.assembly.as_str()), Some("App"));
    }

    #[test]
    fn passes_can_be_disabled() {
        let unit = CompilationUnitDecl::new().with_namespace(
            NamespaceDecl::new("N", 1).with(
                ClassDecl::new("C", 2)
                    .with(MethodDecl::new("M", 3))
                    .with(MethodDecl::new("M", 4)),
            ),
        );
        let config = CompilerConfig::new()
            .with_member_validation(false)
            .with_synthesis(false);
        let compilation = Compiler::new(config).compile(&unit);
        assert_eq!(compilation.diagnostics.count_of(ErrorKind::CannotOverloadMethod), 0);
        assert!(compilation.find_interface("N.IC").is_none());
    }
}
