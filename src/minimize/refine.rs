use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    graph::{NodeId, TransducerGraph},
    math::Map,
    minimize::{rebuild_quotient, Minimize},
    Symbol,
};

/// Partition-refinement (Hopcroft-style) minimizer driven by scanning raw arcs.
///
/// The partition starts from three blocks -- a synthetic sink standing in for "no
/// transition defined", the accepting states and the remaining states -- and is refined by
///
/// inverse-image evidence: for a pending `(block, symbol)` work item, every source with an
/// arc on `symbol` into the block is grouped by its own current block, and each group that
/// is a strict nonempty subset of its block splits it. The smaller of group and complement
/// is the part that moves into a fresh block (this smaller-half choice is what gives the
/// n·log n bound) and the fresh block is enqueued for every symbol of the alphabet.
///
/// Inverse images come straight from the graph's `(target, input)` index; determinism of
/// the graph guarantees a source appears at most once per image, so no deduplication pass
/// is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RefinementMinimizer {
    sparse: bool,
}

impl RefinementMinimizer {
    /// A minimizer that always materializes inverse images of the sink block.
    pub fn new() -> Self {
        Self { sparse: false }
    }

    /// Sparse mode: when the input graph is arc-complete, no state can ever fall into the
    /// sink block, so scanning complements against it is skipped entirely. On incomplete
    /// graphs the flag is ignored.
    pub fn sparse() -> Self {
        Self { sparse: true }
    }
}

/// Dense index of the synthetic sink, one past the reachable states.
struct Refinement<S> {
    symbols: Vec<S>,
    /// members per block; splits leave the complement in place
    members: Vec<Vec<u32>>,
    block_of: Vec<u32>,
    worklist: VecDeque<(u32, S)>,
}

impl<S: Symbol> Refinement<S> {
    fn split(&mut self, block: u32, group: &[u32], scratch: &mut [bool]) -> Option<u32> {
        let size = self.members[block as usize].len();
        if group.len() == size {
            return None;
        }
        debug_assert!(!group.is_empty() && group.len() < size);
        for &q in group {
            scratch[q as usize] = true;
        }
        let mut complement = Vec::with_capacity(size - group.len());
        self.members[block as usize].retain(|&q| {
            let in_group = scratch[q as usize];
            if !in_group {
                complement.push(q);
            }
            in_group
        });
        for &q in group {
            scratch[q as usize] = false;
        }

        // keep the larger part under the old block id, move the smaller half out
        let new_id = self.members.len() as u32;
        let moved = if group.len() <= complement.len() {
            std::mem::replace(&mut self.members[block as usize], complement)
        } else {
            complement
        };
        self.members.push(moved);
        for &q in &self.members[new_id as usize] {
            self.block_of[q as usize] = new_id;
        }
        for symbol in &self.symbols {
            self.worklist.push_back((new_id, symbol.clone()));
        }
        Some(new_id)
    }
}

impl<S: Symbol> Minimize<S> for RefinementMinimizer {
    fn minimize(&self, graph: &TransducerGraph<S>) -> TransducerGraph<S> {
        let order = super::reachable_nodes(graph);
        if order.is_empty() {
            return graph.clone();
        }
        let n = order.len();
        let index_of: Map<NodeId, usize> = order
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();
        let symbols = graph.symbols();
        let skip_sink = self.sparse && graph.is_arc_complete();
        if self.sparse && !skip_sink {
            debug!("sparse refinement requested on an arc-incomplete graph, ignoring");
        }
        // dense states 0..n are the reachable nodes, n is the synthetic sink (if any)
        let sink = n as u32;
        let state_count = if skip_sink { n } else { n + 1 };

        let mut refinement = Refinement {
            symbols: symbols.clone(),
            members: Vec::new(),
            block_of: vec![0; state_count],
            worklist: VecDeque::new(),
        };
        let mut initial: Vec<Vec<u32>> = Vec::new();
        if !skip_sink {
            initial.push(vec![sink]);
        }
        let (accepting, rejecting): (Vec<u32>, Vec<u32>) = (0..n as u32)
            .partition(|&q| graph.is_accepting(order[q as usize]));
        initial.extend([accepting, rejecting].into_iter().filter(|b| !b.is_empty()));
        for block in initial {
            let id = refinement.members.len() as u32;
            for &q in &block {
                refinement.block_of[q as usize] = id;
            }
            for symbol in &symbols {
                refinement.worklist.push_back((id, symbol.clone()));
            }
            refinement.members.push(block);
        }

        let mut scratch = vec![false; state_count];
        while let Some((block, symbol)) = refinement.worklist.pop_front() {
            // inverse image of the block's current members under `symbol`
            let mut image: Vec<u32> = Vec::new();
            for &q in &refinement.members[block as usize] {
                if q == sink {
                    // arcs "into the sink" are the missing transitions, plus the sink's
                    // own self-loops on the full alphabet
                    for (r, &node) in order.iter().enumerate() {
                        if graph.arc_by_source_and_input(node, &symbol).is_none() {
                            image.push(r as u32);
                        }
                    }
                    image.push(sink);
                } else {
                    for id in graph.arcs_by_target_and_input(order[q as usize], &symbol) {
                        let arc = graph.arc(id).expect("index only holds live arcs");
                        if let Some(&source) = index_of.get(&arc.source()) {
                            image.push(source as u32);
                        }
                    }
                }
            }
            if image.is_empty() {
                continue;
            }
            let mut groups: Map<u32, Vec<u32>> = Map::default();
            for q in image {
                groups
                    .entry(refinement.block_of[q as usize])
                    .or_default()
                    .push(q);
            }
            for (owner, group) in groups.into_iter().sorted_by_key(|(owner, _)| *owner) {
                if let Some(new_id) = refinement.split(owner, &group, &mut scratch) {
                    trace!(
                        "split block {} on {:?}, moved {} states into block {}",
                        owner,
                        symbol,
                        refinement.members[new_id as usize].len(),
                        new_id
                    );
                }
            }
        }

        // renumber blocks by first appearance over the dense states, dropping the sink
        let mut class_ids: Map<u32, u32> = Map::default();
        let mut class_of = Vec::with_capacity(n);
        for q in 0..n {
            let block = refinement.block_of[q];
            let next = class_ids.len() as u32;
            class_of.push(*class_ids.entry(block).or_insert(next));
        }
        debug!(
            "partition refinement: {} reachable states in {} classes",
            n,
            class_ids.len()
        );
        rebuild_quotient(graph, &order, &class_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn wiki_dfa() -> TransducerGraph<char> {
        GraphBuilder::default()
            .with_arcs([
                (0, 'a', 0.0, 1),
                (0, 'b', 0.0, 2),
                (1, 'a', 0.0, 0),
                (1, 'b', 0.0, 3),
                (2, 'a', 0.0, 4),
                (2, 'b', 0.0, 5),
                (3, 'a', 0.0, 4),
                (3, 'b', 0.0, 5),
                (4, 'a', 0.0, 4),
                (4, 'b', 0.0, 5),
                (5, 'a', 0.0, 5),
                (5, 'b', 0.0, 5),
            ])
            .with_accepting([2, 3, 4])
            .into_graph(0)
    }

    #[test]
    fn wiki_dfa_minimizes_to_three_states() {
        let min = RefinementMinimizer::new().minimize(&wiki_dfa());
        assert_eq!(min.nodes().len(), 3);
        assert!(min.path_weight(&['b']).is_some());
        assert!(min.path_weight(&['a', 'b']).is_some());
        assert!(min.path_weight(&['a', 'a']).is_none());
    }

    #[test]
    fn sparse_mode_agrees_on_complete_graphs() {
        let g = wiki_dfa();
        assert!(g.is_arc_complete());
        let dense = RefinementMinimizer::new().minimize(&g);
        let sparse = RefinementMinimizer::sparse().minimize(&g);
        assert_eq!(dense.nodes().len(), sparse.nodes().len());
        assert_eq!(dense.arc_count(), sparse.arc_count());
        for path in [vec!['b'], vec!['a', 'b'], vec!['b', 'a', 'a']] {
            assert_eq!(dense.path_weight(&path), sparse.path_weight(&path));
        }
    }

    #[test]
    fn incomplete_graphs_split_on_missing_transitions() {
        // state 1 lacks a 'b' transition, state 2 has one; the sink block tells them apart
        let g = GraphBuilder::default()
            .with_arcs([
                (0, 'a', 0.0, 1),
                (0, 'b', 0.0, 2),
                (1, 'a', 0.0, 3),
                (2, 'a', 0.0, 3),
                (2, 'b', 0.0, 3),
            ])
            .with_accepting([3])
            .into_graph(0);
        let min = RefinementMinimizer::new().minimize(&g);
        assert_eq!(min.nodes().len(), 4);
        assert_eq!(min.path_weight(&['b', 'b']), Some(0.0));
        assert_eq!(min.path_weight(&['a', 'b']), None);
    }

    #[test]
    fn dead_states_collapse_into_one() {
        // 1 and 2 both reject everything and collapse into a single dead class
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 0.0, 1), (0, 'b', 0.0, 2), (0, 'c', 0.0, 3)])
            .with_accepting([3])
            .into_graph(0);
        let min = RefinementMinimizer::new().minimize(&g);
        assert_eq!(min.nodes().len(), 3);
        assert_eq!(min.path_weight(&['c']), Some(0.0));
        assert_eq!(min.path_weight(&['a']), None);
    }
}
