//! SymbolTable - merged lookup over local declarations and imported metadata.
//!
//! # Lookup Order
//!
//! 1. Local declarations inserted while the declaration tree is built.
//! 2. Imported entries already materialized by an earlier lookup.
//! 3. The shared [`MetadataCache`]; a hit is materialized and memoized so the
//!    miss cost is paid once.
//! 4. Intrinsic types every compilation can name (the event registration token).
//!
//! # Thread Safety
//!
//! The table is mutated by lookups (memoization) and is used from a single
//! thread. The metadata cache behind it is immutable and shared via `Arc`.
//! Entries are never overwritten: `insert` on an existing name is a no-op.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use xidl_core::{
    EVENT_REGISTRATION_TOKEN, ImportedCategory, ImportedType, ImportedTypeId, TypeCategory,
};

use crate::MetadataCache;

/// Types that resolve without any imported metadata.
const INTRINSIC_TYPES: &[(&str, ImportedCategory)] =
    &[(EVENT_REGISTRATION_TOKEN, ImportedCategory::Struct)];

/// Name-to-declaration table for one compilation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Qualified name -> declaration (local and memoized imports).
    symbols: FxHashMap<String, TypeCategory>,

    /// Imported entries materialized so far, indexed by `ImportedTypeId`.
    imported: Vec<ImportedType>,

    /// Read-through metadata cache.
    cache: Option<Arc<MetadataCache>>,
}

impl SymbolTable {
    /// Create a table with no imported metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table reading through to `cache`.
    pub fn with_cache(cache: Arc<MetadataCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::default()
        }
    }

    /// Insert a declaration. Returns false, changing nothing, if the name exists.
    pub fn insert(&mut self, qualified_name: impl Into<String>, category: TypeCategory) -> bool {
        let qualified_name = qualified_name.into();
        if self.symbols.contains_key(&qualified_name) {
            return false;
        }
        self.symbols.insert(qualified_name, category);
        true
    }

    /// Look up a qualified name, materializing imported entries on first use.
    pub fn lookup(&mut self, qualified_name: &str) -> Option<TypeCategory> {
        if let Some(category) = self.symbols.get(qualified_name) {
            return Some(*category);
        }

        let imported = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(qualified_name))
            .cloned()
            .or_else(|| {
                INTRINSIC_TYPES
                    .iter()
                    .find(|(name, _)| *name == qualified_name)
                    .map(|(name, category)| ImportedType::new(*name, *category, "<intrinsic>"))
            })?;

        Some(self.materialize(imported))
    }

    fn materialize(&mut self, ty: ImportedType) -> TypeCategory {
        let id = ImportedTypeId::from_index(self.imported.len());
        let category = TypeCategory::Imported(id, ty.category);
        tracing::trace!(name = %ty.qualified_name, source = %ty.source, "materialized import");
        self.symbols.insert(ty.qualified_name.clone(), category);
        self.imported.push(ty);
        category
    }

    /// Look up without materializing; only names already in the table match.
    pub fn get(&self, qualified_name: &str) -> Option<TypeCategory> {
        self.symbols.get(qualified_name).copied()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.symbols.contains_key(qualified_name)
    }

    /// An imported entry materialized by an earlier lookup.
    pub fn imported(&self, id: ImportedTypeId) -> &ImportedType {
        &self.imported[id.index()]
    }

    /// Number of imported entries materialized so far.
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    /// Number of names in the table, memoized imports included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
