//! Imported metadata: sources of external declarations and the shared cache
//! the symbol table reads through.
//!
//! Decoding binary metadata containers is a collaborator's job. This module
//! defines the boundary ([`MetadataSource`]), an in-memory implementation,
//! a line-oriented manifest reader, and [`MetadataCache::load_all`], which loads
//! every source on the rayon pool and merges the results after the join.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use xidl_core::{EnumBase, FundamentalType, ImportedCategory, ImportedType, MetadataError};

/// Anything that yields namespaced declarations from an external container.
pub trait MetadataSource: Send + Sync {
    /// Display name used in logs and errors.
    fn name(&self) -> &str;

    /// Read every declaration in the container.
    fn load(&self) -> Result<Vec<ImportedType>, MetadataError>;
}

/// A metadata container held in memory.
#[derive(Debug, Clone, Default)]
pub struct MetadataDatabase {
    name: String,
    types: Vec<ImportedType>,
}

impl MetadataDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Add a declaration.
    pub fn with_type(mut self, qualified_name: &str, category: ImportedCategory) -> Self {
        let ty = ImportedType::new(qualified_name, category, self.name.clone());
        self.types.push(ty);
        self
    }

    /// Add an enum declaration with an explicit underlying type.
    pub fn with_enum(mut self, qualified_name: &str, underlying: EnumBase) -> Self {
        let ty = ImportedType::new(qualified_name, ImportedCategory::Enum, self.name.clone())
            .with_underlying(underlying);
        self.types.push(ty);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl MetadataSource for MetadataDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<ImportedType>, MetadataError> {
        Ok(self.types.clone())
    }
}

/// A text manifest listing one declaration per line.
///
/// ```text
/// # comment
/// interface Foundation.IClosable
/// struct    Foundation.Point
/// enum      Foundation.AsyncStatus Int32
/// enum      Foundation.Flags 0x09
/// ```
///
/// The optional third column of an enum line is the underlying type, as a
/// keyword or an element-type code.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
    name: String,
}

impl ManifestSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Parse manifest text. `source_name` labels entries and errors.
    pub fn parse(source_name: &str, text: &str) -> Result<Vec<ImportedType>, MetadataError> {
        let mut types = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.split_whitespace();
            let (Some(keyword), Some(qualified_name)) = (columns.next(), columns.next()) else {
                return Err(MetadataError::Malformed {
                    source_name: source_name.to_string(),
                    line: index + 1,
                    detail: "expected '<category> <qualified name>'".to_string(),
                });
            };
            let category = ImportedCategory::from_keyword(keyword).ok_or_else(|| {
                MetadataError::UnknownCategory {
                    source_name: source_name.to_string(),
                    category: keyword.to_string(),
                }
            })?;
            let mut ty = ImportedType::new(qualified_name, category, source_name);
            if let Some(underlying) = columns.next() {
                let base = (category == ImportedCategory::Enum)
                    .then(|| parse_underlying(underlying))
                    .flatten()
                    .ok_or_else(|| MetadataError::Malformed {
                        source_name: source_name.to_string(),
                        line: index + 1,
                        detail: format!("invalid enum underlying type '{underlying}'"),
                    })?;
                ty = ty.with_underlying(base);
            }
            types.push(ty);
        }
        Ok(types)
    }
}

fn parse_underlying(text: &str) -> Option<EnumBase> {
    let fundamental = match text.strip_prefix("0x") {
        Some(code) => FundamentalType::try_from(u8::from_str_radix(code, 16).ok()?).ok()?,
        None => FundamentalType::from_keyword(text)?,
    };
    EnumBase::try_from(fundamental).ok()
}

impl MetadataSource for ManifestSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<ImportedType>, MetadataError> {
        let text = fs::read_to_string(&self.path).map_err(|source| MetadataError::Io {
            path: self.path.clone(),
            source,
        })?;
        Self::parse(&self.name, &text)
    }
}

/// Read-only index of imported declarations by qualified name.
#[derive(Debug, Default)]
pub struct MetadataCache {
    types: FxHashMap<String, ImportedType>,
}

impl MetadataCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every source in parallel, then merge in source order.
    ///
    /// When two sources declare the same name the earlier source wins.
    #[tracing::instrument(skip_all, fields(sources = sources.len()))]
    pub fn load_all(sources: &[Arc<dyn MetadataSource>]) -> Result<Self, MetadataError> {
        let loaded: Vec<Vec<ImportedType>> = sources
            .par_iter()
            .map(|source| -> Result<Vec<ImportedType>, MetadataError> {
                let types = source.load()?;
                tracing::debug!(source = source.name(), count = types.len(), "loaded metadata");
                Ok(types)
            })
            .collect::<Result<_, MetadataError>>()?;

        let mut cache = Self::new();
        for types in loaded {
            for ty in types {
                cache.insert(ty);
            }
        }
        Ok(cache)
    }

    /// Insert a declaration unless the name is already present.
    pub fn insert(&mut self, ty: ImportedType) -> bool {
        if self.types.contains_key(&ty.qualified_name) {
            tracing::trace!(name = %ty.qualified_name, source = %ty.source, "shadowed import");
            return false;
        }
        self.types.insert(ty.qualified_name.clone(), ty);
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ImportedType> {
        self.types.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest() {
        let text = "# foundation\n\
                    interface Foundation.IClosable\n\
                    \n\
                    enum Foundation.AsyncStatus Int32\n\
                    enum Foundation.Flags 0x09\n";
        let types = ManifestSource::parse("foundation", text).unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(types[0].category, ImportedCategory::Interface);
        assert_eq!(types[1].underlying, Some(EnumBase::Int32));
        assert_eq!(types[2].underlying, Some(EnumBase::UInt32));
        assert_eq!(types[2].source, "foundation");
    }

    #[test]
    fn parse_manifest_errors() {
        let err = ManifestSource::parse("m", "interface\n").unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { line: 1, .. }));

        let err = ManifestSource::parse("m", "union A.B\n").unwrap_err();
        assert!(matches!(err, MetadataError::UnknownCategory { .. }));

        let err = ManifestSource::parse("m", "enum A.E String\n").unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { .. }));

        let err = ManifestSource::parse("m", "struct A.S Int32\n").unwrap_err();
        assert!(matches!(err, MetadataError::Malformed { .. }));
    }

    #[test]
    fn missing_manifest_is_io_error() {
        let source = ManifestSource::new("/nonexistent/xidl/foundation.meta");
        assert!(matches!(source.load(), Err(MetadataError::Io { .. })));
    }

    #[test]
    fn load_all_merges_first_wins() {
        let first: Arc<dyn MetadataSource> = Arc::new(
            MetadataDatabase::new("first")
                .with_type("Foundation.Uri", ImportedCategory::Class)
                .with_type("Foundation.IClosable", ImportedCategory::Interface),
        );
        let second: Arc<dyn MetadataSource> = Arc::new(
            MetadataDatabase::new("second").with_type("Foundation.Uri", ImportedCategory::Struct),
        );

        let cache = MetadataCache::load_all(&[first, second]).unwrap();
        assert_eq!(cache.len(), 2);
        let uri = cache.get("Foundation.Uri").unwrap();
        assert_eq!(uri.category, ImportedCategory::Class);
        assert_eq!(uri.source, "first");
    }

    #[test]
    fn load_all_propagates_errors() {
        let ok: Arc<dyn MetadataSource> = Arc::new(MetadataDatabase::new("ok"));
        let bad: Arc<dyn MetadataSource> = Arc::new(ManifestSource::new("/nonexistent/xidl/x.meta"));
        assert!(MetadataCache::load_all(&[ok, bad]).is_err());
    }
}
