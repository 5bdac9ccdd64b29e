use std::collections::VecDeque;

use itertools::Itertools;
use tracing::trace;

use crate::{
    graph::{ArcId, NodeId, TransducerGraph},
    math::Map,
    Symbol,
};

/// Canonicalizes the weight distribution of `graph` by weight pushing.
///
/// A potential λ is computed for every co-reachable node by a backward breadth-first
/// traversal from the accepting set, then every arc weight is replaced by
/// `weight + λ(target) − λ(source)`, with the start node's outgoing arcs additionally
/// absorbing λ(start). The total weight of any accepting path is unchanged, while weight
/// divergence between paths sharing a source is pushed as early as possible; running this
/// before [`crate::graph::processors::fold_weights`] is what lets minimization collapse
/// maximal prefix-sharing states of a weighted graph.
///
/// The transform assumes the start node is never re-entered (which holds for every graph
/// produced by [`crate::builder::build_from_paths`]); a cycle through the start node would
/// absorb λ(start) once per revisit.
///
/// Operates on a private deep copy; the input graph is never mutated.
pub fn quasi_determinize<S: Symbol>(graph: &TransducerGraph<S>) -> TransducerGraph<S> {
    let mut pushed = graph.clone();
    let lambda = potentials(graph);
    let start = graph.start();
    let start_potential = start
        .and_then(|node| lambda.get(&node))
        .copied()
        .unwrap_or(0.0);
    trace!("pushing weights with start potential {}", start_potential);

    let ids: Vec<ArcId> = pushed.arcs().map(|(id, _)| id).collect();
    for id in ids {
        let (source, target, weight) = {
            let arc = pushed.arc(id).expect("enumerated arc handles are live");
            (arc.source(), arc.target(), arc.output().0)
        };
        let mut adjusted = weight + lambda.get(&target).copied().unwrap_or(0.0)
            - lambda.get(&source).copied().unwrap_or(0.0);
        if Some(source) == start {
            adjusted += start_potential;
        }
        pushed.set_arc_weight(id, adjusted);
    }
    pushed
}

/// Backward BFS from all accepting nodes (λ = 0, distance 0 at each). A node is assigned
/// λ on first discovery; among arcs reaching it at the same BFS distance, the one with the
/// lexicographically smallest input symbol wins. The tie-break is required, not incidental:
/// it fixes a canonical choice among equally short paths so the pushed graph is identical
/// across runs regardless of hash iteration order.
fn potentials<S: Symbol>(graph: &TransducerGraph<S>) -> Map<NodeId, f64> {
    let mut lambda: Map<NodeId, f64> = Map::default();
    let mut distance: Map<NodeId, u32> = Map::default();
    let mut tie_break: Map<NodeId, S> = Map::default();
    let mut queue = VecDeque::new();

    for node in graph.accepting().iter().copied().sorted() {
        lambda.insert(node, 0.0);
        distance.insert(node, 0);
        queue.push_back(node);
    }

    while let Some(node) = queue.pop_front() {
        let d = distance[&node];
        let base = lambda[&node];
        for id in graph.arcs_by_target(node) {
            let arc = graph.arc(id).expect("index only holds live arcs");
            let source = arc.source();
            match distance.get(&source).copied() {
                None => {
                    distance.insert(source, d + 1);
                    lambda.insert(source, arc.output().0 + base);
                    tie_break.insert(source, arc.input().clone());
                    queue.push_back(source);
                }
                Some(sd) if sd == d + 1 => {
                    // same BFS layer, prefer the smaller input symbol
                    if tie_break
                        .get(&source)
                        .map_or(true, |best| arc.input() < best)
                    {
                        lambda.insert(source, arc.output().0 + base);
                        tie_break.insert(source, arc.input().clone());
                    }
                }
                Some(_) => {}
            }
        }
    }
    lambda
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn weight_moves_to_the_shared_prefix() {
        let g = build_from_paths([(vec!['a', 'c'], 1.0), (vec!['a', 'b', 'c'], 1.0)], -1);
        let pushed = quasi_determinize(&g);
        // total path weights are conserved
        assert_eq!(pushed.path_weight(&['a', 'c']), Some(1.0));
        assert_eq!(pushed.path_weight(&['a', 'b', 'c']), Some(1.0));
        // and all of it now sits on the first arc out of the start node
        let start = pushed.start().unwrap();
        let first = pushed
            .arc(pushed.arc_by_source_and_input(start, &'a').unwrap())
            .unwrap();
        assert_eq!(first.output(), Weight(1.0));
        for (_, arc) in pushed.arcs() {
            if arc.source() != start {
                assert_eq!(arc.output(), Weight(0.0));
            }
        }
    }

    #[test]
    fn ties_break_toward_the_smaller_symbol() {
        // both arcs reach the accepting node in one step; λ must come from the 'a' arc
        let g = GraphBuilder::default()
            .with_arcs([(0, 'x', 0.0, 1), (1, 'a', 2.0, 2), (1, 'b', 5.0, 2)])
            .with_accepting([2])
            .into_graph(0);
        let pushed = quasi_determinize(&g);
        let n1 = pushed
            .arc(pushed.arc_by_source_and_input(pushed.start().unwrap(), &'x').unwrap())
            .unwrap()
            .target();
        let a = pushed.arc(pushed.arc_by_source_and_input(n1, &'a').unwrap()).unwrap();
        let b = pushed.arc(pushed.arc_by_source_and_input(n1, &'b').unwrap()).unwrap();
        assert_eq!(a.output(), Weight(0.0));
        assert_eq!(b.output(), Weight(3.0));
        assert_eq!(pushed.path_weight(&['x', 'a']), Some(2.0));
        assert_eq!(pushed.path_weight(&['x', 'b']), Some(5.0));
    }

    #[test]
    fn conservation_on_a_cyclic_graph() {
        let g = GraphBuilder::default()
            .with_arcs([
                (0, 'a', 1.0, 1),
                (1, 'b', 2.0, 2),
                (2, 'a', 0.5, 1),
                (1, 'c', 4.0, 3),
            ])
            .with_accepting([3])
            .into_graph(0);
        let pushed = quasi_determinize(&g);
        for path in [
            vec!['a', 'c'],
            vec!['a', 'b', 'a', 'c'],
            vec!['a', 'b', 'a', 'b', 'a', 'c'],
        ] {
            assert_eq!(g.path_weight(&path), pushed.path_weight(&path));
        }
    }

    #[test]
    fn input_graph_is_untouched() {
        let g = build_from_paths([(vec!['a', 'b'], 3.0)], -1);
        let before: Vec<Weight> = g.arcs().map(|(_, a)| a.output()).collect();
        let _ = quasi_determinize(&g);
        let after: Vec<Weight> = g.arcs().map(|(_, a)| a.output()).collect();
        assert_eq!(before, after);
    }
}
