use tracing::{debug, trace};

use crate::{
    graph::{NodeId, TransducerGraph},
    math::Map,
    Symbol,
};

/// Builds a graph from a multiset of weighted symbol sequences.
///
/// Every path runs from the start node to a single shared accepting end node; the path's
/// count is added to its final arc, so the total weight of each accepting path equals the
/// accumulated count of that path. Interior arcs carry weight zero until the
/// quasi-determinizer redistributes weight along shared prefixes.
///
/// `markov_order` controls how much history makes up the identity of interior nodes:
/// - `0` collapses all interior states into a single shared state (a bag-of-symbols
///   automaton),
/// - a positive `k` keys states on the trailing `k` symbols of the consumed prefix
///   (bounded-memory automaton),
/// - a negative value keys states on the full consumed prefix (trie automaton).
///
/// Paths whose arcs would violate determinism under the chosen order (for instance a path
/// that is a proper prefix of another at order `0`) are partially dropped: the offending
/// arc and the rest of the path are silently skipped, matching the non-strict insertion
/// contract. Prefix arcs inserted before the conflict stay behind with weight zero; they
/// either join live structure through a merged history or form a dead branch, which
/// minimization folds into a single dead class.
pub fn build_from_paths<S, I>(paths: I, markov_order: i32) -> TransducerGraph<S>
where
    S: Symbol,
    I: IntoIterator<Item = (Vec<S>, f64)>,
{
    let mut graph = TransducerGraph::new();
    let start = graph.add_node();
    graph.set_start(start);
    let end = graph.add_node();
    graph.mark_accepting(end);

    let mut by_history: Map<Vec<S>, NodeId> = Map::default();
    for (path, count) in paths {
        if path.is_empty() {
            debug!("skipping empty path, the graph model has no epsilon arcs");
            continue;
        }
        let mut source = start;
        for (position, input) in path.iter().enumerate() {
            let last = position + 1 == path.len();
            let target = if last {
                end
            } else {
                match by_history.get(&history_key(&path[..=position], markov_order)) {
                    Some(&node) => node,
                    None => {
                        let node = graph.add_node();
                        by_history.insert(history_key(&path[..=position], markov_order), node);
                        node
                    }
                }
            };
            let weight = if last { count } else { 0.0 };
            if !graph.increment_arc(source, target, input.clone(), weight) {
                trace!(
                    "dropping nondeterministic arc for path position {} at order {}",
                    position,
                    markov_order
                );
                break;
            }
            source = target;
        }
    }
    graph
}

/// The state identity of a consumed prefix under the given markov order.
fn history_key<S: Clone>(prefix: &[S], markov_order: i32) -> Vec<S> {
    if markov_order == 0 {
        Vec::new()
    } else if markov_order > 0 {
        let keep = (markov_order as usize).min(prefix.len());
        prefix[prefix.len() - keep..].to_vec()
    } else {
        prefix.to_vec()
    }
}

/// Helper struct for the construction of graphs in tests and examples. It stores a list of
/// arcs over small integer node names and a list of accepting node names; the nodes are
/// allocated densely when the graph is materialized.
///
/// # Example
///
/// ```
/// use transducer::prelude::*;
///
/// let graph = GraphBuilder::default()
///     .with_arcs([(0, 'a', 1.0, 1), (1, 'b', 2.0, 2)])
///     .with_accepting([2])
///     .into_graph(0);
/// assert_eq!(graph.path_weight(&['a', 'b']), Some(3.0));
/// ```
pub struct GraphBuilder<S = char> {
    arcs: Vec<(u32, S, f64, u32)>,
    accepting: Vec<u32>,
}

impl<S> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self {
            arcs: Vec::new(),
            accepting: Vec::new(),
        }
    }
}

impl<S: Symbol> GraphBuilder<S> {
    /// Adds a list of arcs given as `(source, input, weight, target)` tuples.
    pub fn with_arcs<I: IntoIterator<Item = (u32, S, f64, u32)>>(mut self, iter: I) -> Self {
        self.arcs.extend(iter);
        self
    }

    /// Marks the given node names as accepting.
    pub fn with_accepting<I: IntoIterator<Item = u32>>(mut self, iter: I) -> Self {
        self.accepting.extend(iter);
        self
    }

    /// Materializes the graph with `start` as start node. Panics if the listed arcs are
    /// not deterministic or contain duplicates; the builder is meant for hand-written
    /// fixtures where either would be a bug.
    pub fn into_graph(self, start: u32) -> TransducerGraph<S> {
        let highest = self
            .arcs
            .iter()
            .flat_map(|(source, _, _, target)| [*source, *target])
            .chain(self.accepting.iter().copied())
            .chain(std::iter::once(start))
            .max()
            .unwrap_or(0);
        let mut graph = TransducerGraph::new();
        let nodes: Vec<NodeId> = (0..=highest).map(|_| graph.add_node()).collect();
        graph.set_start(nodes[start as usize]);
        for next in self.accepting {
            graph.mark_accepting(nodes[next as usize]);
        }
        for (source, input, weight, target) in self.arcs {
            assert!(
                graph.add_arc(nodes[source as usize], nodes[target as usize], input, weight),
                "builder arcs must be unique and deterministic"
            );
        }
        graph
    }
}
