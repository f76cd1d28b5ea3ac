//! Cycle Detection Pass - Find structs that contain themselves by value and
//! interfaces that require themselves.
//!
//! Both searches are depth-first with a path-local visited set, driven by an
//! explicit stack rather than recursion. The result is
//! memoized on the declaration as a [`CycleState`], so a declaration reached
//! again from another root costs one lookup. Only resolved references are
//! edges; an unresolved or imported reference ends the search there.
//!
//! A declaration is circular when its search reaches a cycle, whether or not
//! the declaration is itself on that cycle. Each circular struct and
//! interface is reported once.

use std::hash::Hash;

use rustc_hash::FxHashSet;
use xidl_core::{CycleState, ErrorKind, ObjectId, StructId};
use xidl_registry::TypeModel;

use crate::context::CompilationContext;

/// Output of the cycle detection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleOutput {
    pub circular_structs: usize,
    pub circular_interfaces: usize,
}

// ==========================================================================
// Graph views
// ==========================================================================

/// A directed view of the type model with a memoized cycle state per node.
trait CycleGraph {
    type Node: Copy + Eq + Hash;

    fn edges(&self, node: Self::Node) -> Vec<Self::Node>;
    fn state(&self, node: Self::Node) -> CycleState;
    fn set_state(&mut self, node: Self::Node, state: CycleState);
}

/// Struct to struct edges through by-value fields.
struct StructFields<'m>(&'m mut TypeModel);

impl CycleGraph for StructFields<'_> {
    type Node = StructId;

    fn edges(&self, node: StructId) -> Vec<StructId> {
        self.0
            .structure(node)
            .fields
            .iter()
            .filter_map(|field| field.type_ref.target()?.as_struct())
            .collect()
    }

    fn state(&self, node: StructId) -> CycleState {
        self.0.structure(node).cycle
    }

    fn set_state(&mut self, node: StructId, state: CycleState) {
        self.0.structure_mut(node).cycle = state;
    }
}

/// Class or interface to interface edges through requires clauses.
struct Requires<'m>(&'m mut TypeModel);

impl CycleGraph for Requires<'_> {
    type Node = ObjectId;

    fn edges(&self, node: ObjectId) -> Vec<ObjectId> {
        self.0
            .object(node)
            .requires
            .iter()
            .filter_map(|base| base.target()?.as_interface())
            .collect()
    }

    fn state(&self, node: ObjectId) -> CycleState {
        self.0.object(node).cycle
    }

    fn set_state(&mut self, node: ObjectId, state: CycleState) {
        self.0.object_mut(node).cycle = state;
    }
}

// ==========================================================================
// Search
// ==========================================================================

/// Depth-first search from `root` on an explicit stack of
/// `(node, edges, next edge)` frames. On success every node still on the
/// stack leads to the cycle and is marked circular.
fn reaches_cycle<G: CycleGraph>(graph: &mut G, root: G::Node) -> bool {
    let mut path = FxHashSet::default();
    path.insert(root);
    let mut stack = vec![(root, graph.edges(root), 0usize)];

    while let Some((node, edges, cursor)) = stack.last_mut() {
        let Some(&next) = edges.get(*cursor) else {
            let node = *node;
            stack.pop();
            path.remove(&node);
            graph.set_state(node, CycleState::Clear);
            continue;
        };
        *cursor += 1;

        let found = match graph.state(next) {
            CycleState::Circular => true,
            CycleState::Clear => continue,
            CycleState::Unknown => !path.insert(next),
        };
        if found {
            for (node, _, _) in stack {
                graph.set_state(node, CycleState::Circular);
            }
            return true;
        }
        let edges = graph.edges(next);
        stack.push((next, edges, 0));
    }
    false
}

/// Classify `node` unless an earlier search already did, returning whether
/// it is circular.
fn classify<G: CycleGraph>(graph: &mut G, node: G::Node) -> bool {
    if graph.state(node) == CycleState::Unknown {
        reaches_cycle(graph, node);
    }
    graph.state(node) == CycleState::Circular
}

/// Detect struct and interface cycles.
pub struct CycleDetectionPass<'a> {
    ctx: &'a mut CompilationContext,
}

impl<'a> CycleDetectionPass<'a> {
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self { ctx }
    }

    #[tracing::instrument(skip_all)]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self) -> CycleOutput {
        let ctx = self.ctx;
        let mut output = CycleOutput::default();

        let mut structs = StructFields(&mut ctx.model);
        for id in structs.0.struct_ids() {
            if classify(&mut structs, id) {
                let st = structs.0.structure(id);
                ctx.diagnostics.report(
                    ErrorKind::CircularStructField,
                    st.line,
                    st.qualified_name().to_string(),
                );
                output.circular_structs += 1;
            }
        }

        let mut requires = Requires(&mut ctx.model);
        for id in requires.0.object_ids() {
            if classify(&mut requires, id) && requires.0.object(id).is_interface() {
                let interface = requires.0.object(id);
                ctx.diagnostics.report(
                    ErrorKind::CircularInterfaceInheritance,
                    interface.line,
                    interface.qualified_name().to_string(),
                );
                output.circular_interfaces += 1;
            }
        }

        tracing::debug!(
            structs = output.circular_structs,
            interfaces = output.circular_interfaces,
            "cycle detection complete"
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClassDecl, CompilationUnitDecl, InterfaceDecl, NamespaceDecl, StructDecl};
    use crate::context::CompilerConfig;
    use crate::passes::{BuildPass, ResolutionPass};

    fn detect(ns: NamespaceDecl) -> (CompilationContext, CycleOutput) {
        let mut ctx = CompilationContext::new(CompilerConfig::new());
        BuildPass::new(&mut ctx).run(&CompilationUnitDecl::new().with_namespace(ns));
        ResolutionPass::new(&mut ctx).run();
        let output = CycleDetectionPass::new(&mut ctx).run();
        (ctx, output)
    }

    #[test]
    fn every_struct_reaching_a_cycle_is_reported() {
        let (ctx, output) = detect(
            NamespaceDecl::new("N", 1)
                .with(StructDecl::new("S0", 2).field("a", 3, "S1"))
                .with(StructDecl::new("S1", 4).field("a", 5, "S2"))
                .with(StructDecl::new("S2", 6).field("a", 7, "S3"))
                .with(StructDecl::new("S3", 8).field("a", 9, "S1")),
        );
        assert_eq!(output.circular_structs, 4);
        for (name, line) in [("N.S0", 2), ("N.S1", 4), ("N.S2", 6), ("N.S3", 8)] {
            assert!(ctx.diagnostics.error_exists(ErrorKind::CircularStructField, name, line));
        }
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let (ctx, output) = detect(
            NamespaceDecl::new("N", 1)
                .with(StructDecl::new("S0", 2).field("a", 3, "S1").field("b", 3, "S2"))
                .with(StructDecl::new("S1", 4).field("a", 5, "S3"))
                .with(StructDecl::new("S2", 6).field("a", 7, "S3"))
                .with(StructDecl::new("S3", 8).field("x", 9, "Int32")),
        );
        assert_eq!(output.circular_structs, 0);
        assert!(ctx.diagnostics.is_empty());
        assert!(ctx.model.structs().all(|(_, s)| s.cycle == CycleState::Clear));
    }

    #[test]
    fn long_struct_chain_without_cycle() {
        let mut ns = NamespaceDecl::new("N", 1);
        for i in 0..10_000u32 {
            let next = if i == 9_999 { "Int32".to_string() } else { format!("S{}", i + 1) };
            ns = ns.with(StructDecl::new(format!("S{i}"), i + 2).field("next", i + 2, next));
        }
        let (ctx, output) = detect(ns);
        assert_eq!(output.circular_structs, 0);
        assert!(ctx.diagnostics.is_empty());
        assert!(ctx.model.structs().all(|(_, s)| s.cycle == CycleState::Clear));
    }

    #[test]
    fn long_interface_chain_closing_on_itself() {
        let mut ns = NamespaceDecl::new("N", 1);
        for i in 0..10_000u32 {
            let base = if i == 9_999 { "I0".to_string() } else { format!("I{}", i + 1) };
            ns = ns.with(InterfaceDecl::new(format!("I{i}"), i + 2).requires(base));
        }
        let (ctx, output) = detect(ns);
        assert_eq!(output.circular_interfaces, 10_000);
        assert!(ctx.diagnostics.error_exists(ErrorKind::CircularInterfaceInheritance, "N.I0", 2));
        assert!(ctx.diagnostics.error_exists(ErrorKind::CircularInterfaceInheritance, "N.I9999", 10_001));
    }

    #[test]
    fn self_containing_struct() {
        let (ctx, _) = detect(NamespaceDecl::new("N", 1).with(StructDecl::new("S", 2).field("s", 3, "S")));
        assert!(ctx.diagnostics.error_exists(ErrorKind::CircularStructField, "N.S", 2));
    }

    #[test]
    fn interface_cycle_reports_interfaces_only() {
        let (ctx, output) = detect(
            NamespaceDecl::new("N", 1)
                .with(InterfaceDecl::new("IA", 2).requires("IB"))
                .with(InterfaceDecl::new("IB", 3).requires("IA"))
                .with(ClassDecl::new("C", 4).requires("IA")),
        );
        assert_eq!(output.circular_interfaces, 2);
        assert!(ctx.diagnostics.error_exists(ErrorKind::CircularInterfaceInheritance, "N.IA", 2));
        assert!(ctx.diagnostics.error_exists(ErrorKind::CircularInterfaceInheritance, "N.IB", 3));
        assert_eq!(ctx.diagnostics.count_of(ErrorKind::CircularInterfaceInheritance), 2);
    }

    #[test]
    fn unresolved_base_is_no_edge() {
        let (ctx, output) = detect(NamespaceDecl::new("N", 1).with(InterfaceDecl::new("IA", 2).requires("Missing")));
        assert_eq!(output.circular_interfaces, 0);
        assert_eq!(ctx.diagnostics.semantic_error_count(), 1);
    }
}
