//! Namespace Tree - hierarchical storage for declared names.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (bodies and merged member names at that level)
//! - Edges: `Contains(name)` from parent to child namespace

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use xidl_core::TypeCategory;

/// Edge types in the namespace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEdge {
    /// Parent namespace contains child namespace.
    /// The String is the child's simple name.
    Contains(String),
}

/// One physical `namespace N { ... }` block in source.
#[derive(Debug, Clone, Default)]
pub struct NamespaceBody {
    /// Line of the namespace keyword.
    pub line: u32,
    /// Declarations in this body, in source order.
    pub declarations: Vec<TypeCategory>,
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Dotted qualified name; empty for the root.
    pub qualified_name: String,

    /// Every re-opening of this namespace, in source order.
    pub bodies: Vec<NamespaceBody>,

    /// Declarations by simple name, merged across all bodies.
    pub members: FxHashMap<String, TypeCategory>,
}

impl NamespaceData {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            ..Self::default()
        }
    }
}

/// The namespace graph.
pub struct NamespaceTree {
    /// The directed graph storing all namespaces.
    graph: DiGraph<NamespaceData, NamespaceEdge>,

    /// The root (global) namespace node.
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NamespaceTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceTree")
            .field("namespaces", &self.graph.node_count())
            .finish()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::new(""));
        Self { graph, root }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get a namespace node's data.
    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Get a mutable reference to a namespace node's data.
    pub fn get_namespace_mut(&mut self, node: NodeIndex) -> Option<&mut NamespaceData> {
        self.graph.node_weight_mut(node)
    }

    /// Number of namespaces, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() <= 1
    }

    /// Find a child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph.edges(parent).find_map(|edge| match edge.weight() {
            NamespaceEdge::Contains(child_name) if child_name == name => Some(edge.target()),
            _ => None,
        })
    }

    /// Child namespaces of `parent` with their simple names.
    pub fn children(&self, parent: NodeIndex) -> impl Iterator<Item = (&str, NodeIndex)> {
        self.graph.edges(parent).map(|edge| match edge.weight() {
            NamespaceEdge::Contains(name) => (name.as_str(), edge.target()),
        })
    }

    /// Find a sibling whose name equals `name` ignoring case but not exactly.
    pub fn find_case_conflict(&self, parent: NodeIndex, name: &str) -> Option<&str> {
        self.children(parent)
            .map(|(child, _)| child)
            .find(|child| *child != name && child.eq_ignore_ascii_case(name))
    }

    /// Get or create a child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }

        let qualified = match self.graph[parent].qualified_name.as_str() {
            "" => name.to_string(),
            parent_name => format!("{parent_name}.{name}"),
        };
        let child = self.graph.add_node(NamespaceData::new(qualified));
        self.graph
            .add_edge(parent, child, NamespaceEdge::Contains(name.to_string()));
        child
    }

    /// Get or create a namespace path from root.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let mut current = self.root;
        for segment in path {
            current = self.get_or_create_child(current, segment.as_ref());
        }
        current
    }

    /// Get an existing namespace by path, or None if it doesn't exist.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        let mut current = self.root;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Find a namespace by dotted name.
    pub fn find(&self, qualified: &str) -> Option<NodeIndex> {
        let path: Vec<&str> = qualified.split('.').filter(|s| !s.is_empty()).collect();
        self.get_path(&path)
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    /// Dotted qualified name of a namespace node.
    pub fn qualified_name(&self, node: NodeIndex) -> &str {
        self.graph
            .node_weight(node)
            .map(|ns| ns.qualified_name.as_str())
            .unwrap_or("")
    }

    /// Record a new physical body of `node`, returning its index.
    pub fn open_body(&mut self, node: NodeIndex, line: u32) -> usize {
        let ns = &mut self.graph[node];
        ns.bodies.push(NamespaceBody {
            line,
            declarations: Vec::new(),
        });
        ns.bodies.len() - 1
    }

    /// Add a declaration to a namespace body.
    ///
    /// Member names are unique across all bodies; on a clash the existing
    /// declaration is returned and nothing is added.
    pub fn add_member(
        &mut self,
        node: NodeIndex,
        body: usize,
        name: &str,
        category: TypeCategory,
    ) -> Result<(), TypeCategory> {
        let ns = &mut self.graph[node];
        if let Some(existing) = ns.members.get(name) {
            return Err(*existing);
        }
        ns.members.insert(name.to_string(), category);
        if let Some(body) = ns.bodies.get_mut(body) {
            body.declarations.push(category);
        }
        Ok(())
    }

    /// Look up a declaration by simple name within one namespace.
    pub fn lookup_member(&self, node: NodeIndex, name: &str) -> Option<TypeCategory> {
        self.graph
            .node_weight(node)
            .and_then(|ns| ns.members.get(name).copied())
    }

    /// All namespace nodes in creation order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xidl_core::{EnumId, StructId};

    #[test]
    fn create_and_find_path() {
        let mut tree = NamespaceTree::new();
        let ab = tree.get_or_create_path(&["A", "B"]);
        assert_eq!(tree.get_path(&["A", "B"]), Some(ab));
        assert_eq!(tree.find("A.B"), Some(ab));
        assert_eq!(tree.qualified_name(ab), "A.B");
        assert_eq!(tree.get_path(&["A", "C"]), None);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut tree = NamespaceTree::new();
        let first = tree.get_or_create_path(&["N"]);
        let second = tree.get_or_create_path(&["N"]);
        assert_eq!(first, second);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn parent_links() {
        let mut tree = NamespaceTree::new();
        let a = tree.get_or_create_path(&["A"]);
        let ab = tree.get_or_create_path(&["A", "B"]);
        assert_eq!(tree.find_parent(ab), Some(a));
        assert_eq!(tree.find_parent(a), Some(tree.root()));
        assert_eq!(tree.find_parent(tree.root()), None);
    }

    #[test]
    fn members_unique_across_bodies() {
        let mut tree = NamespaceTree::new();
        let n = tree.get_or_create_path(&["N"]);
        let b0 = tree.open_body(n, 1);
        let b1 = tree.open_body(n, 10);

        assert!(tree.add_member(n, b0, "E", TypeCategory::Enum(EnumId(0))).is_ok());
        assert_eq!(
            tree.add_member(n, b1, "E", TypeCategory::Struct(StructId(0))),
            Err(TypeCategory::Enum(EnumId(0)))
        );

        let data = tree.get_namespace(n).unwrap();
        assert_eq!(data.bodies.len(), 2);
        assert_eq!(data.bodies[0].declarations.len(), 1);
        assert!(data.bodies[1].declarations.is_empty());
        assert_eq!(tree.lookup_member(n, "E"), Some(TypeCategory::Enum(EnumId(0))));
    }

    #[test]
    fn case_conflict_detection() {
        let mut tree = NamespaceTree::new();
        let a = tree.get_or_create_path(&["A"]);
        tree.get_or_create_child(a, "Sub");
        assert_eq!(tree.find_case_conflict(a, "sub"), Some("Sub"));
        assert_eq!(tree.find_case_conflict(a, "Sub"), None);
        assert_eq!(tree.find_case_conflict(a, "Other"), None);
    }
}
