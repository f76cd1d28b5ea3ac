//! Compiler options builder.

use std::fmt;
use std::sync::Arc;

use xidl_compiler::CompilerConfig;
use xidl_registry::MetadataSource;

use crate::session::{Session, SessionError};

/// Everything needed to start a [`Session`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use xidl::{CompilerOptions, MetadataDatabase};
/// use xidl::core::ImportedCategory;
///
/// let foundation = MetadataDatabase::new("Foundation")
///     .with_type("Foundation.IClosable", ImportedCategory::Interface);
///
/// let session = CompilerOptions::new()
///     .with_assembly_name("Contoso")
///     .with_metadata_source(Arc::new(foundation))
///     .build()
///     .unwrap();
/// assert_eq!(session.imported_type_count(), 1);
/// ```
#[derive(Clone)]
pub struct CompilerOptions {
    assembly_name: String,
    sources: Vec<Arc<dyn MetadataSource>>,
    synthesize_runtimeclasses: bool,
    validate_members: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            assembly_name: "default".to_string(),
            sources: Vec::new(),
            synthesize_runtimeclasses: true,
            validate_members: true,
        }
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("assembly_name", &self.assembly_name)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("synthesize_runtimeclasses", &self.synthesize_runtimeclasses)
            .field("validate_members", &self.validate_members)
            .finish()
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembly recorded on every declaration.
    pub fn with_assembly_name(mut self, name: impl Into<String>) -> Self {
        self.assembly_name = name.into();
        self
    }

    /// Add a source of imported declarations. Sources earlier in the list win
    /// when two declare the same qualified name.
    pub fn with_metadata_source(mut self, source: Arc<dyn MetadataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_metadata_sources(
        mut self,
        sources: impl IntoIterator<Item = Arc<dyn MetadataSource>>,
    ) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn with_synthesis(mut self, enabled: bool) -> Self {
        self.synthesize_runtimeclasses = enabled;
        self
    }

    pub fn with_member_validation(mut self, enabled: bool) -> Self {
        self.validate_members = enabled;
        self
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    pub fn sources(&self) -> &[Arc<dyn MetadataSource>] {
        &self.sources
    }

    /// The per-compilation switches handed to the driver.
    pub fn config(&self) -> CompilerConfig {
        CompilerConfig::new()
            .with_assembly_name(self.assembly_name.clone())
            .with_member_validation(self.validate_members)
            .with_synthesis(self.synthesize_runtimeclasses)
    }

    /// Load every metadata source and return a session ready to compile.
    pub fn build(self) -> Result<Session, SessionError> {
        Session::new(self)
    }
}
