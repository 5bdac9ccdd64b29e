use std::collections::BTreeMap;

use bit_set::BitSet;
use itertools::Itertools;
use tracing::debug;

use crate::{
    graph::{NodeId, TransducerGraph},
    math::{Map, UnionFind},
    minimize::{rebuild_quotient, sorted_out_arcs, Minimize},
    Symbol,
};

/// The classical O(n²) pairwise-distinguishability (Moore-style) minimizer.
///
/// Every pair of reachable states is examined once; pairs whose fate hangs on another pair
/// are recorded as dependents and marked by stack-based propagation once that pair is
/// distinguished. Quadratic in the state count, so only suitable for moderate automata;
/// it is kept around chiefly as an oracle to cross-validate the partition-refinement
/// minimizers against.
#[derive(Debug, Default, Clone, Copy)]
pub struct PairwiseMinimizer;

/// A stricter view of a deterministic graph where each state directly owns its outgoing
/// transition map, one transition per input symbol. Indices into the view are positions in
/// the canonical reachable-state enumeration.
struct StateView<S> {
    accepting: Vec<bool>,
    transitions: Vec<BTreeMap<S, usize>>,
}

impl<S: Symbol> StateView<S> {
    fn new(graph: &TransducerGraph<S>, order: &[NodeId]) -> Self {
        let index_of: Map<NodeId, usize> = order
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();
        let mut accepting = Vec::with_capacity(order.len());
        let mut transitions = Vec::with_capacity(order.len());
        for &node in order {
            accepting.push(graph.is_accepting(node));
            let mut map = BTreeMap::new();
            for arc in sorted_out_arcs(graph, node) {
                let prior = map.insert(arc.input().clone(), index_of[&arc.target()]);
                debug_assert!(prior.is_none(), "graph determinism guarantees one transition per input");
            }
            transitions.push(map);
        }
        Self {
            accepting,
            transitions,
        }
    }

    fn len(&self) -> usize {
        self.accepting.len()
    }
}

/// Triangular pair bookkeeping over a flat bit set.
struct PairMarks {
    n: usize,
    distinct: BitSet,
}

impl PairMarks {
    fn new(n: usize) -> Self {
        Self {
            n,
            distinct: BitSet::with_capacity(n * n),
        }
    }

    fn marked(&self, i: usize, j: usize) -> bool {
        self.distinct.contains(i * self.n + j)
    }

    /// Marks the pair, returns `false` if it already was marked.
    fn mark(&mut self, i: usize, j: usize) -> bool {
        let fresh = self.distinct.insert(i * self.n + j);
        if fresh {
            self.distinct.insert(j * self.n + i);
        }
        fresh
    }
}

fn ordered(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

impl<S: Symbol> Minimize<S> for PairwiseMinimizer {
    fn minimize(&self, graph: &TransducerGraph<S>) -> TransducerGraph<S> {
        let order = super::reachable_nodes(graph);
        if order.is_empty() {
            return graph.clone();
        }
        let view = StateView::new(graph, &order);
        let n = view.len();

        let mut marks = PairMarks::new(n);
        let mut dependents: Map<(usize, usize), Vec<(usize, usize)>> = Map::default();
        let mut stack: Vec<(usize, usize)> = Vec::new();

        // a pair is distinct from the outset iff exactly one of the two states accepts;
        // no dependents exist yet, so seeding marks without going through the stack
        for i in 0..n {
            for j in i + 1..n {
                if view.accepting[i] != view.accepting[j] {
                    marks.mark(i, j);
                }
            }
        }

        for i in 0..n {
            for j in i + 1..n {
                if marks.marked(i, j) {
                    continue;
                }
                examine(&view, i, j, &mut marks, &mut dependents, &mut stack);
                cascade(&mut marks, &mut dependents, &mut stack);
            }
        }
        debug_assert!(stack.is_empty());

        let mut classes = UnionFind::new(n);
        for i in 0..n {
            for j in i + 1..n {
                if !marks.marked(i, j) {
                    classes.union(i, j);
                }
            }
        }
        let mut class_ids: Map<usize, u32> = Map::default();
        let mut class_of = Vec::with_capacity(n);
        for i in 0..n {
            let root = classes.find(i);
            let next = class_ids.len() as u32;
            class_of.push(*class_ids.entry(root).or_insert(next));
        }
        debug!(
            "pairwise minimization: {} reachable states in {} classes",
            n,
            class_ids.len()
        );
        rebuild_quotient(graph, &order, &class_of)
    }
}

/// Examines one undistinguished pair: over the union of the two states' defined input
/// symbols, a transition one of them lacks distinguishes the pair immediately, targets
/// already known distinct do too, and unresolved target pairs record this pair as their
/// dependent.
fn examine<S: Symbol>(
    view: &StateView<S>,
    i: usize,
    j: usize,
    marks: &mut PairMarks,
    dependents: &mut Map<(usize, usize), Vec<(usize, usize)>>,
    stack: &mut Vec<(usize, usize)>,
) {
    let symbols = view.transitions[i]
        .keys()
        .merge(view.transitions[j].keys())
        .dedup();
    for symbol in symbols {
        match (
            view.transitions[i].get(symbol),
            view.transitions[j].get(symbol),
        ) {
            (Some(&a), Some(&b)) => {
                if a == b {
                    continue;
                }
                let (a, b) = ordered(a, b);
                if marks.marked(a, b) {
                    if marks.mark(i, j) {
                        stack.push((i, j));
                    }
                    return;
                }
                dependents.entry((a, b)).or_default().push((i, j));
            }
            // one state moves where the other has nothing defined
            _ => {
                if marks.mark(i, j) {
                    stack.push((i, j));
                }
                return;
            }
        }
    }
}

/// Propagates freshly distinguished pairs to everything recorded as dependent on them.
/// Stack-based on purpose, recursion depth would otherwise be unbounded on large automata.
fn cascade(
    marks: &mut PairMarks,
    dependents: &mut Map<(usize, usize), Vec<(usize, usize)>>,
    stack: &mut Vec<(usize, usize)>,
) {
    while let Some(pair) = stack.pop() {
        let Some(waiting) = dependents.remove(&pair) else {
            continue;
        };
        for (i, j) in waiting {
            if marks.mark(i, j) {
                stack.push((i, j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn indistinguishable_accepting_states_merge() {
        // two accepting sinks reached on different symbols collapse into one
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 1.0, 1), (0, 'b', 1.0, 2)])
            .with_accepting([1, 2])
            .into_graph(0);
        let min = PairwiseMinimizer.minimize(&g);
        assert_eq!(min.nodes().len(), 2);
        assert_eq!(min.arc_count(), 2);
        let start = min.start().unwrap();
        let ta = min.arc(min.arc_by_source_and_input(start, &'a').unwrap()).unwrap().target();
        let tb = min.arc(min.arc_by_source_and_input(start, &'b').unwrap()).unwrap().target();
        assert_eq!(ta, tb);
        assert!(min.is_accepting(ta));
        assert_eq!(min.path_weight(&['a']), Some(1.0));
        assert_eq!(min.path_weight(&['b']), Some(1.0));
    }

    #[test]
    fn acceptance_alone_distinguishes_without_examination() {
        // the one reachable pair is seeded distinct, the examination loop has nothing
        // left to do and must terminate cleanly
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 1.0, 1)])
            .with_accepting([1])
            .into_graph(0);
        let min = PairwiseMinimizer.minimize(&g);
        assert_eq!(min.nodes().len(), 2);
        assert_eq!(min.path_weight(&['a']), Some(1.0));
    }

    #[test]
    fn missing_transitions_distinguish() {
        // state 1 can continue with 'b', state 2 cannot, so they must not merge
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 0.0, 1), (0, 'b', 0.0, 2), (1, 'b', 0.0, 3)])
            .with_accepting([1, 2, 3])
            .into_graph(0);
        let min = PairwiseMinimizer.minimize(&g);
        assert_eq!(min.path_weight(&['a', 'b']), Some(0.0));
        assert_eq!(min.path_weight(&['b', 'b']), None);
        // 2 and 3 merge (accepting, no outgoing), 1 stays separate
        assert_eq!(min.nodes().len(), 3);
    }

    #[test]
    fn dependency_cascade_marks_transitively() {
        // the pair (1, 4) is examined before its target pair (2, 5) and parks on its
        // dependency list; only when (2, 5) is distinguished does the cascade mark (1, 4)
        let g = GraphBuilder::default()
            .with_arcs([
                (0, 'a', 0.0, 1),
                (1, 'a', 0.0, 2),
                (2, 'a', 0.0, 3),
                (0, 'b', 0.0, 4),
                (4, 'a', 0.0, 5),
                (5, 'a', 0.0, 6),
            ])
            .with_accepting([3])
            .into_graph(0);
        let min = PairwiseMinimizer.minimize(&g);
        assert_eq!(min.path_weight(&['a', 'a', 'a']), Some(0.0));
        assert_eq!(min.path_weight(&['b', 'a', 'a']), None);
        // no two of the seven states accept the same suffix language
        assert_eq!(min.nodes().len(), 7);
    }

    #[test]
    fn graph_without_start_is_copied() {
        let mut g: TransducerGraph<char> = TransducerGraph::new();
        let n = g.add_node();
        g.mark_accepting(n);
        let min = PairwiseMinimizer.minimize(&g);
        assert_eq!(min.arc_count(), 0);
    }
}
