//! Storage for the IDL compiler: namespace tree, type model arenas, symbol
//! table and imported metadata.

mod metadata;
mod model;
mod namespace_tree;
mod symbol_table;

pub use metadata::{ManifestSource, MetadataCache, MetadataDatabase, MetadataSource};
pub use model::TypeModel;
pub use namespace_tree::{NamespaceBody, NamespaceData, NamespaceEdge, NamespaceTree};
pub use symbol_table::SymbolTable;

pub use petgraph::graph::NodeIndex;
