use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, error};

use crate::{
    graph::TransducerGraph,
    math::Map,
    minimize::{rebuild_quotient, sorted_out_arcs, Minimize},
    Symbol,
};

/// Partition-refinement minimizer driven by explicit block and split objects.
///
/// Algorithmically this performs the same Hopcroft-style refinement as
/// [`super::RefinementMinimizer`], but instead of scanning the graph's arc indices during
/// the run it materializes a predecessor table up front and funnels every candidate
/// refinement through a [`Split`] record before applying it. The two implementations must
/// accept identical path-weight functions on every input; the integration tests hold them
/// to that.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockMinimizer;

/// A set of states currently believed mutually indistinguishable.
#[derive(Debug)]
struct Block {
    members: BTreeSet<u32>,
}

impl Block {
    fn singleton(state: u32) -> Self {
        Self {
            members: BTreeSet::from([state]),
        }
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

/// A pending refinement: the members of `block` known to reach the current splitter on
/// some symbol. Applying it cuts the block in two unless the members cover the block.
#[derive(Debug)]
struct Split {
    block: usize,
    members: Vec<u32>,
}

struct Partitioning {
    blocks: Vec<Block>,
    block_of: Map<u32, usize>,
}

impl Partitioning {
    /// The owning block of a state. A state without one means the refinement bookkeeping
    /// itself is broken, which has no recovery path.
    fn owner(&self, state: u32) -> usize {
        match self.block_of.get(&state) {
            Some(&block) => block,
            None => {
                error!("state {} has no owning block", state);
                panic!("partition refinement lost track of a state");
            }
        }
    }

    fn install(&mut self, block: Block) -> usize {
        let id = self.blocks.len();
        for &q in &block.members {
            self.block_of.insert(q, id);
        }
        self.blocks.push(block);
        id
    }

    /// Applies a split, returning the id of the freshly created block holding the smaller
    /// half, or `None` when the split members cover the whole block.
    fn apply(&mut self, split: Split) -> Option<usize> {
        let block = &self.blocks[split.block];
        debug_assert!(!split.members.is_empty());
        if split.members.len() == block.len() {
            return None;
        }
        let inside: BTreeSet<u32> = split.members.iter().copied().collect();
        let outside: BTreeSet<u32> = block.members.difference(&inside).copied().collect();
        // the smaller half becomes the new block
        let moved = if inside.len() <= outside.len() {
            self.blocks[split.block].members = outside;
            inside
        } else {
            self.blocks[split.block].members = inside;
            outside
        };
        Some(self.install(Block { members: moved }))
    }
}

impl<S: Symbol> Minimize<S> for BlockMinimizer {
    fn minimize(&self, graph: &TransducerGraph<S>) -> TransducerGraph<S> {
        let order = super::reachable_nodes(graph);
        if order.is_empty() {
            return graph.clone();
        }
        let n = order.len();
        let symbols = graph.symbols();
        let k = symbols.len();
        let sink = n as u32;

        // predecessor table over dense states, sink included: pred[q * k + s] are the
        // states entering q on symbols[s], where entering the sink means having no
        // transition on that symbol
        let index_of: Map<_, usize> = order
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();
        let symbol_index: Map<&S, usize> = symbols.iter().enumerate().map(|(i, s)| (s, i)).collect();
        let mut pred: Vec<Vec<u32>> = vec![Vec::new(); (n + 1) * k];
        for (q, &node) in order.iter().enumerate() {
            let mut defined = vec![false; k];
            for arc in sorted_out_arcs(graph, node) {
                let s = symbol_index[arc.input()];
                defined[s] = true;
                if let Some(&target) = index_of.get(&arc.target()) {
                    pred[target * k + s].push(q as u32);
                }
            }
            for (s, was_defined) in defined.into_iter().enumerate() {
                if !was_defined {
                    pred[n * k + s].push(q as u32);
                }
            }
        }
        for s in 0..k {
            // the sink loops onto itself on the whole alphabet
            pred[n * k + s].push(sink);
        }

        let mut partitioning = Partitioning {
            blocks: Vec::new(),
            block_of: Map::default(),
        };
        let mut worklist: VecDeque<(usize, usize)> = VecDeque::new();
        let sink_block = partitioning.install(Block::singleton(sink));
        let mut seed = |partitioning: &mut Partitioning, members: BTreeSet<u32>| {
            if !members.is_empty() {
                Some(partitioning.install(Block { members }))
            } else {
                None
            }
        };
        let accepting: BTreeSet<u32> = (0..n as u32)
            .filter(|&q| graph.is_accepting(order[q as usize]))
            .collect();
        let rejecting: BTreeSet<u32> = (0..n as u32).filter(|q| !accepting.contains(q)).collect();
        let initial: Vec<usize> = [Some(sink_block)]
            .into_iter()
            .chain([
                seed(&mut partitioning, accepting),
                seed(&mut partitioning, rejecting),
            ])
            .flatten()
            .collect();
        for block in initial {
            for s in 0..k {
                worklist.push_back((block, s));
            }
        }

        while let Some((splitter, s)) = worklist.pop_front() {
            let mut grouped: Map<usize, Vec<u32>> = Map::default();
            for &q in &partitioning.blocks[splitter].members {
                for &source in &pred[q as usize * k + s] {
                    grouped
                        .entry(partitioning.owner(source))
                        .or_default()
                        .push(source);
                }
            }
            let mut splits: Vec<Split> = grouped
                .into_iter()
                .map(|(block, members)| Split { block, members })
                .collect();
            splits.sort_by_key(|split| split.block);
            for split in splits {
                if let Some(fresh) = partitioning.apply(split) {
                    for s in 0..k {
                        worklist.push_back((fresh, s));
                    }
                }
            }
        }

        let mut class_ids: Map<usize, u32> = Map::default();
        let mut class_of = Vec::with_capacity(n);
        for q in 0..n as u32 {
            let owner = partitioning.owner(q);
            let next = class_ids.len() as u32;
            class_of.push(*class_ids.entry(owner).or_insert(next));
        }
        debug!(
            "block refinement: {} reachable states in {} classes",
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

    #[test]
    fn agrees_with_arc_scanning_refinement() {
        let g = GraphBuilder::default()
            .with_arcs([
                (0, 'a', 0.0, 1),
                (0, 'b', 0.0, 2),
                (1, 'a', 0.0, 3),
                (1, 'b', 0.0, 4),
                (2, 'a', 0.0, 3),
                (2, 'b', 0.0, 4),
                (3, 'a', 0.0, 3),
                (4, 'b', 0.0, 4),
            ])
            .with_accepting([3, 4])
            .into_graph(0);
        let by_blocks = BlockMinimizer.minimize(&g);
        let by_arcs = RefinementMinimizer::new().minimize(&g);
        assert_eq!(by_blocks.nodes().len(), by_arcs.nodes().len());
        for path in [
            vec!['a', 'a'],
            vec!['b', 'b'],
            vec!['a', 'b', 'b'],
            vec!['a', 'a', 'b'],
        ] {
            assert_eq!(by_blocks.path_weight(&path), by_arcs.path_weight(&path));
        }
    }

    #[test]
    fn splits_cascade_through_chains() {
        // 0-a->1-a->2-a->3(acc): every chain position is a distinct class
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 0.0, 1), (1, 'a', 0.0, 2), (2, 'a', 0.0, 3)])
            .with_accepting([3])
            .into_graph(0);
        let min = BlockMinimizer.minimize(&g);
        assert_eq!(min.nodes().len(), 4);
        assert_eq!(min.path_weight(&['a', 'a', 'a']), Some(0.0));
        assert_eq!(min.path_weight(&['a', 'a']), None);
    }

    #[test]
    fn merges_symmetric_branches() {
        // the 1/2 pair behaves identically, as does 3/4
        let g = GraphBuilder::default()
            .with_arcs([
                (0, 'a', 0.0, 1),
                (0, 'b', 0.0, 2),
                (1, 'c', 0.0, 3),
                (2, 'c', 0.0, 4),
            ])
            .with_accepting([3, 4])
            .into_graph(0);
        let min = BlockMinimizer.minimize(&g);
        assert_eq!(min.nodes().len(), 3);
        assert_eq!(min.path_weight(&['a', 'c']), Some(0.0));
        assert_eq!(min.path_weight(&['b', 'c']), Some(0.0));
    }
}
