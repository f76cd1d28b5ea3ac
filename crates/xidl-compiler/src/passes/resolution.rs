//! Resolution Pass (Pass 1) - Bind every type reference to its declaration.
//!
//! A reference containing a `.` is looked up as written. Any other reference
//! is looked up relative to the namespace of the declaration that holds it.
//! Imported metadata is consulted through the symbol table, so imported
//! types are materialized here on first use.
//!
//! References inside synthesized accessors repeat the property or event type
//! and are resolved without diagnostics; the property or event reports once.

use xidl_core::{Diagnostics, ErrorKind, QualifiedName, TypeCategory, TypeRef};
use xidl_registry::SymbolTable;

use crate::context::CompilationContext;

/// Output of the resolution pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolutionOutput {
    pub resolved: usize,
    pub unresolved: usize,
}

/// Pass 1: resolve type references.
pub struct ResolutionPass<'a> {
    ctx: &'a mut CompilationContext,
}

/// Name used to look up `name` when written inside `namespace`.
pub fn lookup_key(namespace: &str, name: &str) -> String {
    if QualifiedName::is_qualified_str(name) {
        name.to_string()
    } else {
        QualifiedName::in_namespace(namespace, name).to_string()
    }
}

/// Symbol lookups plus the diagnostics they raise.
struct Resolver<'t> {
    symbols: &'t mut SymbolTable,
    diagnostics: &'t mut Diagnostics,
    output: ResolutionOutput,
}

impl Resolver<'_> {
    /// Resolve one unresolved reference, returning the lookup key and the
    /// category it bound to.
    fn resolve(
        &mut self,
        namespace: &str,
        type_ref: &mut TypeRef,
        line: u32,
        report: bool,
    ) -> Option<(String, TypeCategory)> {
        if type_ref.is_resolved() {
            return None;
        }
        let key = lookup_key(namespace, type_ref.name());
        match self.symbols.lookup(&key) {
            Some(category) => {
                type_ref.resolve(category.into());
                self.output.resolved += 1;
                Some((key, category))
            }
            None => {
                self.output.unresolved += 1;
                if report {
                    self.diagnostics.report(ErrorKind::UnresolvedType, line, key);
                }
                None
            }
        }
    }
}

impl<'a> ResolutionPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    /// Run the resolution pass.
    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self) -> ResolutionOutput {
        let ctx = self.ctx;
        let mut resolver = Resolver {
            symbols: &mut ctx.symbols,
            diagnostics: &mut ctx.diagnostics,
            output: ResolutionOutput::default(),
        };
        let model = &mut ctx.model;

        // ==========================================================================
        // Classes and interfaces
        // ==========================================================================

        for id in model.object_ids() {
            let object = model.object_mut(id);
            let namespace = object.namespace.clone();

            for required in &mut object.requires {
                if required.is_resolved() {
                    continue;
                }
                let key = lookup_key(&namespace, required.name());
                match resolver.symbols.lookup(&key) {
                    Some(category) if category.is_interface() => {
                        required.resolve(category.into());
                        resolver.output.resolved += 1;
                    }
                    Some(category) => {
                        tracing::debug!(%key, kind = category.kind_name(), "required type is not an interface");
                        resolver
                            .diagnostics
                            .report(ErrorKind::TypeNotInterface, object.line, key);
                    }
                    None => {
                        resolver.output.unresolved += 1;
                        resolver
                            .diagnostics
                            .report(ErrorKind::UnresolvedType, object.line, key);
                    }
                }
            }

            for method in &mut object.methods {
                let line = method.line;
                let report = method.is_explicit();
                for type_ref in method.type_refs_mut() {
                    resolver.resolve(&namespace, type_ref, line, report);
                }
            }

            for property in &mut object.properties {
                resolver.resolve(&namespace, &mut property.type_ref, property.line, true);
            }

            for event in &mut object.events {
                if let Some((key, category)) =
                    resolver.resolve(&namespace, &mut event.type_ref, event.line, true)
                    && !category.is_delegate()
                {
                    resolver
                        .diagnostics
                        .report(ErrorKind::TypeNotDelegate, event.line, key);
                }
            }

            if let Some(class) = object.class_data_mut() {
                for constructor in &mut class.constructors {
                    for parameter in &mut constructor.parameters {
                        resolver.resolve(&namespace, &mut parameter.type_ref, constructor.line, true);
                    }
                }
            }
        }

        // ==========================================================================
        // Structs and delegates
        // ==========================================================================

        for id in model.struct_ids() {
            let st = model.structure_mut(id);
            for field in &mut st.fields {
                resolver.resolve(&st.namespace, &mut field.type_ref, field.line, true);
            }
        }

        for id in model.delegate_ids() {
            let delegate = model.delegate_mut(id);
            let namespace = delegate.namespace.clone();
            let line = delegate.line;
            for type_ref in delegate.type_refs_mut() {
                resolver.resolve(&namespace, type_ref, line, true);
            }
        }

        tracing::debug!(
            resolved = resolver.output.resolved,
            unresolved = resolver.output.unresolved,
            "resolution pass complete"
        );
        resolver.output
    }
}
