use crate::{
    graph::{NodeId, TransducerGraph},
    minimize::sorted_out_arcs,
    Symbol,
};

/// Generates a random deterministic weighted graph of `size` nodes over an alphabet of
/// `symbols` distinct characters by drawing a target and a weight for every
/// `(node, symbol)` pair. Node 0 is the start node and never the target of an arc, so the
/// result is safe to feed through weight pushing; every other node is accepting with
/// probability `accepting_fraction` (at least one always is).
///
/// The resulting graph is arc-complete, which also exercises the sparse mode of the
/// refinement minimizer.
pub fn generate_random_graph(
    symbols: usize,
    size: usize,
    accepting_fraction: f64,
) -> TransducerGraph<char> {
    assert!(size >= 2, "need at least a start and one accepting node");
    assert!((1..=26).contains(&symbols));

    let mut graph = TransducerGraph::new();
    let nodes: Vec<NodeId> = (0..size).map(|_| graph.add_node()).collect();
    graph.set_start(nodes[0]);

    let alphabet: Vec<char> = (0..symbols).map(|i| (b'a' + i as u8) as char).collect();
    for &node in &nodes {
        for &sym in &alphabet {
            let target = nodes[fastrand::usize(1..size)];
            let weight = fastrand::f64() * 10.0;
            graph.add_arc(node, target, sym, weight);
        }
    }
    for &node in &nodes[1..] {
        if fastrand::f64() < accepting_fraction {
            graph.mark_accepting(node);
        }
    }
    if graph.accepting().is_empty() {
        graph.mark_accepting(nodes[size - 1]);
    }
    graph
}

/// Draws a random accepting path by walking from the start node, choosing uniformly among
/// each node's outgoing arcs. At an accepting node the walk stops with probability one
/// half (or when the node has no outgoing arcs); `None` when the walk hits a dead
/// non-accepting end or exceeds `max_len` steps without stopping on an accepting node.
pub fn sample_accepting_path<S: Symbol>(
    graph: &TransducerGraph<S>,
    max_len: usize,
) -> Option<Vec<S>> {
    let mut current = graph.start()?;
    let mut path = Vec::new();
    for _ in 0..max_len {
        let out = sorted_out_arcs(graph, current);
        if graph.is_accepting(current) && (out.is_empty() || fastrand::bool()) {
            return Some(path);
        }
        if out.is_empty() {
            return None;
        }
        let arc = out[fastrand::usize(..out.len())];
        path.push(arc.input().clone());
        current = arc.target();
    }
    graph.is_accepting(current).then_some(path)
}
