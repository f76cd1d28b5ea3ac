//! A compilation session: imported metadata loaded once, shared by every
//! compilation that follows.

use std::sync::Arc;

use thiserror::Error;
use xidl_compiler::ast::CompilationUnitDecl;
use xidl_compiler::{Compilation, Compiler};
use xidl_core::MetadataError;
use xidl_registry::MetadataCache;

use crate::options::CompilerOptions;

/// Failure to start a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load imported metadata: {0}")]
    Metadata(#[from] MetadataError),
}

/// Loaded metadata plus the compiler configured from [`CompilerOptions`].
#[derive(Debug, Clone)]
pub struct Session {
    compiler: Compiler,
    metadata: Arc<MetadataCache>,
}

impl Session {
    /// Load every source named by `options`.
    #[tracing::instrument(skip_all, fields(assembly = options.assembly_name()))]
    pub fn new(options: CompilerOptions) -> Result<Self, SessionError> {
        let metadata = Arc::new(MetadataCache::load_all(options.sources())?);
        tracing::debug!(imported = metadata.len(), "metadata ready");

        let compiler = Compiler::new(options.config()).with_metadata(Arc::clone(&metadata));
        Ok(Self { compiler, metadata })
    }

    /// Compile one unit against the loaded metadata.
    pub fn compile(&self, unit: &CompilationUnitDecl) -> Compilation {
        self.compiler.compile(unit)
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn metadata(&self) -> &Arc<MetadataCache> {
        &self.metadata
    }

    pub fn imported_type_count(&self) -> usize {
        self.metadata.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidl_core::ImportedType;
    use xidl_registry::{MetadataDatabase, MetadataSource};

    struct Broken;

    impl MetadataSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self) -> Result<Vec<ImportedType>, MetadataError> {
            Err(MetadataError::Malformed {
                source_name: "broken".into(),
                line: 1,
                detail: "truncated".into(),
            })
        }
    }

    #[test]
    fn metadata_failure_is_an_error() {
        let err = CompilerOptions::new()
            .with_metadata_source(Arc::new(MetadataDatabase::new("ok")))
            .with_metadata_source(Arc::new(Broken))
            .build()
            .unwrap_err();
        assert!(matches!(err, SessionError::Metadata(_)));
        assert!(err.to_string().starts_with("failed to load imported metadata"));
    }

    #[test]
    fn empty_session() {
        let session = Session::new(CompilerOptions::default()).unwrap();
        assert_eq!(session.imported_type_count(), 0);
        assert_eq!(session.compiler().config().assembly_name, "default");
        let compilation = session.compile(&CompilationUnitDecl::new());
        assert!(!compilation.has_errors());
    }
}
