use itertools::Itertools;

use crate::{
    graph::{Arc, NodeId, TransducerGraph},
    math::{Map, Set},
    Symbol,
};

pub mod blocks;
pub mod pairwise;
pub mod refine;

pub use blocks::BlockMinimizer;
pub use pairwise::PairwiseMinimizer;
pub use refine::RefinementMinimizer;

/// Strategy interface for automaton minimization. All implementations must preserve the
/// weighted language of the input graph (assuming weights were made prefix-canonical by
/// [`crate::push::quasi_determinize`] and folded into the labels beforehand, otherwise only
/// the accepted symbol sequences are preserved) and never increase the number of states.
///
/// Minimizers assume a well-formed graph; malformed arcs are rejected at construction time
/// and there is no recovery path here. An invariant violation discovered mid-algorithm is a
/// bookkeeping defect and panics.
pub trait Minimize<S: Symbol> {
    /// Computes a minimal graph accepting the same weighted language, restricted to the
    /// states reachable from the start node.
    fn minimize(&self, graph: &TransducerGraph<S>) -> TransducerGraph<S>;
}

/// Breadth-first enumeration of the nodes reachable from the start node, successors
/// explored in ascending input-symbol order so every minimizer sees the same canonical
/// state numbering.
pub(crate) fn reachable_nodes<S: Symbol>(graph: &TransducerGraph<S>) -> Vec<NodeId> {
    let Some(start) = graph.start() else {
        return Vec::new();
    };
    let mut order = vec![start];
    let mut seen: Set<NodeId> = std::iter::once(start).collect();
    let mut head = 0;
    while head < order.len() {
        let node = order[head];
        head += 1;
        for arc in sorted_out_arcs(graph, node) {
            if seen.insert(arc.target()) {
                order.push(arc.target());
            }
        }
    }
    order
}

/// The arcs leaving `node` in ascending input-symbol order.
pub(crate) fn sorted_out_arcs<'a, S: Symbol>(
    graph: &'a TransducerGraph<S>,
    node: NodeId,
) -> Vec<&'a Arc<S>> {
    graph
        .arcs_by_source(node)
        .filter_map(|id| graph.arc(id))
        .sorted_by(|a, b| a.input().cmp(b.input()))
        .collect()
}

/// Builds the quotient graph for a computed state equivalence. `order` is the canonical
/// reachable-state enumeration and `class_of[i]` the equivalence class of `order[i]`; one
/// fresh node is allocated per class in order of first appearance. Arcs are inserted
/// through `can_add_arc`/`add_arc`, silently dropping arcs that collapse onto an occupied
/// `(source, input)` slot under the new node identities.
pub(crate) fn rebuild_quotient<S: Symbol>(
    graph: &TransducerGraph<S>,
    order: &[NodeId],
    class_of: &[u32],
) -> TransducerGraph<S> {
    debug_assert_eq!(order.len(), class_of.len());
    let mut minimized = TransducerGraph::new();
    let mut node_of_class: Map<u32, NodeId> = Map::default();
    for &class in class_of {
        if !node_of_class.contains_key(&class) {
            let node = minimized.add_node();
            node_of_class.insert(class, node);
        }
    }
    let class_by_node: Map<NodeId, u32> = order
        .iter()
        .zip(class_of)
        .map(|(&node, &class)| (node, class))
        .collect();

    // order[0] is always the start node
    minimized.set_start(node_of_class[&class_of[0]]);
    for (i, &node) in order.iter().enumerate() {
        let source = node_of_class[&class_of[i]];
        if graph.is_accepting(node) {
            minimized.mark_accepting(source);
        }
        for arc in sorted_out_arcs(graph, node) {
            let target = node_of_class[&class_by_node[&arc.target()]];
            if minimized.can_add_arc(source, target, arc.input()) {
                minimized.add_arc(source, target, arc.input().clone(), arc.output().0);
            }
        }
    }
    minimized
}
