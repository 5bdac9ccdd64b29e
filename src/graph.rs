use itertools::Itertools;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::{
    math::{Map, Set},
    Show, Symbol,
};

pub mod processors;

/// Opaque handle to a node of a [`TransducerGraph`]. Nodes are allocated by the graph
/// itself and carry no structural meaning beyond identity; after minimization, the nodes of
/// the result are fresh handles representing equivalence classes of the original ones.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of this node in the graph's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Show for NodeId {
    fn show(&self) -> String {
        format!("n{}", self.0)
    }
}

/// Handle to an arc stored in a graph's arc arena. Stale after the arc is removed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ArcId(pub(crate) u32);

impl ArcId {
    /// Position of this arc in the graph's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Additive arc weight. Equality, hashing and ordering use the IEEE 754 total order, so a
/// weight may be part of a folded input label (see [`processors::FoldedLabel`]).
#[derive(Clone, Copy, Default, Debug)]
pub struct Weight(pub f64);

impl Weight {
    /// The neutral element of weight addition.
    pub const ZERO: Weight = Weight(0.0);
}

impl PartialEq for Weight {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Weight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

impl Show for Weight {
    fn show(&self) -> String {
        format!("{}", self.0)
    }
}

/// A directed, weighted, symbol-labeled edge between two nodes. Equality and hashing are
/// defined over `(source, target, input)` only; the output weight is the single mutable
/// field (required by weight pushing), endpoints and input are immutable once constructed.
#[derive(Clone, Debug)]
pub struct Arc<S> {
    source: NodeId,
    target: NodeId,
    input: S,
    output: Weight,
}

impl<S: Symbol> Arc<S> {
    pub(crate) fn new(source: NodeId, target: NodeId, input: S, output: Weight) -> Self {
        Self {
            source,
            target,
            input,
            output,
        }
    }

    /// The node this arc leaves.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// The node this arc enters.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The input symbol labelling this arc.
    pub fn input(&self) -> &S {
        &self.input
    }

    /// The output weight of this arc.
    pub fn output(&self) -> Weight {
        self.output
    }
}

impl<S: Symbol> PartialEq for Arc<S> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target && self.input == other.input
    }
}

impl<S: Symbol> Eq for Arc<S> {}

impl<S: Symbol> Hash for Arc<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.input.hash(state);
    }
}

impl<S: Symbol> Show for Arc<S> {
    fn show(&self) -> String {
        format!(
            "{} -{}/{}-> {}",
            self.source.show(),
            self.input.show(),
            self.output.show(),
            self.target.show()
        )
    }
}

/// A deterministic weighted transducer graph.
///
/// Arcs live in an arena and are reachable through five indices which always reflect the
/// current arc set: by source, by target, by input, by `(source, input)` (a single arc,
/// this is the determinism invariant) and by `(target, input)` (a set of arcs, used for
/// inverse-image computation during partition refinement). Insertion and removal keep all
/// five indices consistent atomically.
///
/// Cloning a graph deep-copies the arc arena, so mutating weights on a clone (which is what
/// the quasi-determinizer does) never aliases the original.
#[derive(Clone)]
pub struct TransducerGraph<S: Symbol> {
    arcs: Vec<Option<Arc<S>>>,
    node_count: u32,
    start: Option<NodeId>,
    accepting: Set<NodeId>,
    by_source: Map<NodeId, Set<ArcId>>,
    by_target: Map<NodeId, Set<ArcId>>,
    by_input: Map<S, Set<ArcId>>,
    by_source_input: Map<(NodeId, S), ArcId>,
    by_target_input: Map<(NodeId, S), Set<ArcId>>,
    strict: bool,
    live_arcs: usize,
}

impl<S: Symbol> Default for TransducerGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> TransducerGraph<S> {
    /// Creates an empty graph. Determinism violations on insertion are silently rejected,
    /// see [`Self::strict`] for the panicking variant.
    pub fn new() -> Self {
        Self {
            arcs: Vec::new(),
            node_count: 0,
            start: None,
            accepting: Set::default(),
            by_source: Map::default(),
            by_target: Map::default(),
            by_input: Map::default(),
            by_source_input: Map::default(),
            by_target_input: Map::default(),
            strict: false,
            live_arcs: 0,
        }
    }

    /// Creates an empty graph in strict mode: inserting a second arc for an occupied
    /// `(source, input)` pair with a different target panics instead of returning `false`.
    /// Use this when the caller's invariant is that the graph must always remain
    /// deterministic and any violation indicates an upstream bug.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::new()
        }
    }

    /// Allocates a fresh node and returns its handle.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count);
        self.node_count += 1;
        id
    }

    /// Whether `node` was allocated by this graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.0 < self.node_count
    }

    /// Number of nodes allocated so far, including nodes no arc touches.
    pub fn allocated_nodes(&self) -> usize {
        self.node_count as usize
    }

    /// Designates `node` as the start node.
    pub fn set_start(&mut self, node: NodeId) {
        debug_assert!(self.contains_node(node));
        self.start = Some(node);
    }

    /// The designated start node, if one was set.
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// Adds `node` to the accepting set. Accepting status is independent of whether the
    /// node has outgoing arcs; self-loops through accepting nodes are legal.
    pub fn mark_accepting(&mut self, node: NodeId) {
        debug_assert!(self.contains_node(node));
        self.accepting.insert(node);
    }

    /// Whether `node` is in the accepting set.
    pub fn is_accepting(&self, node: NodeId) -> bool {
        self.accepting.contains(&node)
    }

    /// The accepting set.
    pub fn accepting(&self) -> &Set<NodeId> {
        &self.accepting
    }

    /// The set of nodes visible to structural queries: the union of all arc endpoints plus
    /// the start node. An isolated accepting node that is neither the start node nor an arc
    /// endpoint is invisible to this query, which mirrors the behaviour the construction
    /// paths rely on.
    pub fn nodes(&self) -> BTreeSet<NodeId> {
        self.by_source
            .keys()
            .chain(self.by_target.keys())
            .copied()
            .chain(self.start)
            .collect()
    }

    /// All distinct input symbols occurring on arcs, in ascending order.
    pub fn symbols(&self) -> Vec<S> {
        self.by_input.keys().cloned().sorted().collect()
    }

    /// Number of arcs currently in the graph.
    pub fn arc_count(&self) -> usize {
        self.live_arcs
    }

    /// Looks up an arc by its handle. `None` for removed or foreign handles.
    pub fn arc(&self, id: ArcId) -> Option<&Arc<S>> {
        self.arcs.get(id.index()).and_then(|slot| slot.as_ref())
    }

    /// Iterates over all arcs together with their handles.
    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &Arc<S>)> + '_ {
        self.arcs
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|arc| (ArcId(i as u32), arc)))
    }

    /// Checks whether an arc `(source, input) -> target` could be inserted without
    /// violating determinism. Returns `false` iff the `(source, input)` slot is already
    /// taken by an arc pointing to a *different* target, even if the exact arc is absent.
    /// Graph-merging transforms use this to silently skip offending arcs instead of
    /// failing.
    pub fn can_add_arc(&self, source: NodeId, target: NodeId, input: &S) -> bool {
        match self.by_source_input.get(&(source, input.clone())) {
            Some(&id) => self.arcs[id.index()]
                .as_ref()
                .is_some_and(|arc| arc.target == target),
            None => true,
        }
    }

    /// Inserts an arc. Returns `false` and leaves the graph unchanged if the exact
    /// `(source, target, input)` arc already exists, an endpoint was not allocated by this
    /// graph, or the `(source, input)` slot is taken by a different target (a
    /// determinism violation, which panics instead when the graph is strict).
    pub fn add_arc(&mut self, source: NodeId, target: NodeId, input: S, output: f64) -> bool {
        if !self.contains_node(source) || !self.contains_node(target) {
            tracing::trace!(
                "rejecting arc with unallocated endpoint {:?} -> {:?}",
                source,
                target
            );
            return false;
        }
        if let Some(&existing) = self.by_source_input.get(&(source, input.clone())) {
            let occupied_target = self.arcs[existing.index()]
                .as_ref()
                .map(|arc| arc.target)
                .unwrap_or(target);
            if occupied_target != target && self.strict {
                tracing::error!(
                    "determinism violation: ({:?}, {}) already leads to {:?}, refusing arc to {:?}",
                    source,
                    input.show(),
                    occupied_target,
                    target
                );
                panic!("determinism violation on strict transducer graph");
            }
            // either the identical arc or a determinism violation, rejected either way
            return false;
        }

        let id = ArcId(self.arcs.len() as u32);
        self.arcs
            .push(Some(Arc::new(source, target, input.clone(), Weight(output))));
        self.live_arcs += 1;
        self.by_source.entry(source).or_default().insert(id);
        self.by_target.entry(target).or_default().insert(id);
        self.by_input.entry(input.clone()).or_default().insert(id);
        self.by_source_input.insert((source, input.clone()), id);
        self.by_target_input
            .entry((target, input))
            .or_default()
            .insert(id);
        true
    }

    /// Inserts the arc if absent, otherwise adds `delta` to the weight of the existing
    /// `(source, target, input)` arc. Repeated insertion of the same path through
    /// [`crate::builder::build_from_paths`] accumulates counts this way instead of creating
    /// duplicate arcs. Returns `false` only when insertion was required and rejected.
    pub fn increment_arc(&mut self, source: NodeId, target: NodeId, input: S, delta: f64) -> bool {
        if let Some(&id) = self.by_source_input.get(&(source, input.clone())) {
            let Some(arc) = self.arcs[id.index()].as_mut() else {
                tracing::error!("source-input index points at removed arc {:?}", id);
                panic!("inconsistent source-input index");
            };
            if arc.target == target {
                arc.output.0 += delta;
                return true;
            }
        }
        self.add_arc(source, target, input, delta)
    }

    /// Removes the arc with the given handle from the arena and all five indices, or
    /// returns `false` without touching anything if the handle is stale.
    pub fn remove_arc(&mut self, id: ArcId) -> bool {
        let Some(slot) = self.arcs.get_mut(id.index()) else {
            return false;
        };
        let Some(arc) = slot.take() else {
            return false;
        };
        self.live_arcs -= 1;
        for (key, index) in [(arc.source, &mut self.by_source), (arc.target, &mut self.by_target)] {
            let arcs = index.get_mut(&key).expect("endpoint index must be present");
            arcs.remove(&id);
            if arcs.is_empty() {
                index.remove(&key);
            }
        }
        let by_input = self
            .by_input
            .get_mut(&arc.input)
            .expect("input index must be present");
        by_input.remove(&id);
        if by_input.is_empty() {
            self.by_input.remove(&arc.input);
        }
        self.by_source_input.remove(&(arc.source, arc.input.clone()));
        let tgt_key = (arc.target, arc.input);
        let by_ti = self
            .by_target_input
            .get_mut(&tgt_key)
            .expect("target-input index must be present");
        by_ti.remove(&id);
        if by_ti.is_empty() {
            self.by_target_input.remove(&tgt_key);
        }
        true
    }

    /// Overwrites the weight of an arc in place. The three identity components of the arc
    /// stay untouched, so no index needs updating. Returns `false` for stale handles.
    pub fn set_arc_weight(&mut self, id: ArcId, weight: f64) -> bool {
        match self.arcs.get_mut(id.index()).and_then(|slot| slot.as_mut()) {
            Some(arc) => {
                arc.output = Weight(weight);
                true
            }
            None => false,
        }
    }

    /// All arcs leaving `source`. Empty for unknown nodes.
    pub fn arcs_by_source(&self, source: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        self.by_source.get(&source).into_iter().flatten().copied()
    }

    /// All arcs entering `target`. Empty for unknown nodes.
    pub fn arcs_by_target(&self, target: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        self.by_target.get(&target).into_iter().flatten().copied()
    }

    /// All arcs labelled with `input`. Empty for unknown symbols.
    pub fn arcs_by_input(&self, input: &S) -> impl Iterator<Item = ArcId> + '_ {
        self.by_input.get(input).into_iter().flatten().copied()
    }

    /// The unique arc leaving `source` on `input`, if any. Uniqueness is the determinism
    /// invariant of this representation.
    pub fn arc_by_source_and_input(&self, source: NodeId, input: &S) -> Option<ArcId> {
        self.by_source_input.get(&(source, input.clone())).copied()
    }

    /// All arcs entering `target` on `input`. This is the inverse image the partition
    /// refinement minimizers scan. Empty for unknown keys.
    pub fn arcs_by_target_and_input(
        &self,
        target: NodeId,
        input: &S,
    ) -> impl Iterator<Item = ArcId> + '_ {
        self.by_target_input
            .get(&(target, input.clone()))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Whether no two arcs share a `(source, input)` pair. Holds by construction; the
    /// method exists so tests and debug assertions can verify the representation.
    pub fn is_deterministic(&self) -> bool {
        let mut seen = Set::default();
        self.arcs()
            .all(|(_, arc)| seen.insert((arc.source, arc.input.clone())))
    }

    /// Whether every visible node has an outgoing arc for every symbol of the alphabet.
    /// The sparse mode of [`crate::minimize::RefinementMinimizer`] relies on this to skip
    /// materializing complements against the synthetic sink block.
    pub fn is_arc_complete(&self) -> bool {
        let symbols = self.symbols();
        self.nodes().iter().all(|&node| {
            symbols
                .iter()
                .all(|sym| self.by_source_input.contains_key(&(node, sym.clone())))
        })
    }

    /// Follows `path` from the start node, summing arc weights. `None` when no start node
    /// is set, the path leaves the graph, or it ends on a non-accepting node. This is the
    /// oracle the minimization tests check weighted-language preservation against.
    pub fn path_weight(&self, path: &[S]) -> Option<f64> {
        let mut current = self.start?;
        let mut total = 0.0;
        for sym in path {
            let id = self.arc_by_source_and_input(current, sym)?;
            let arc = self.arc(id)?;
            total += arc.output.0;
            current = arc.target;
        }
        self.is_accepting(current).then_some(total)
    }

    /// Derives a new graph by mapping every arc through `f`, which receives the arc and
    /// produces the new input label and weight. Endpoint handles, the start node and the
    /// accepting set carry over; arcs are copied, never aliased. Arcs whose image would
    /// violate determinism under the new labels are silently skipped.
    pub fn map_arcs<T: Symbol, F>(&self, f: F) -> TransducerGraph<T>
    where
        F: Fn(&Arc<S>) -> (T, f64),
    {
        let mut derived = TransducerGraph::new();
        derived.node_count = self.node_count;
        derived.start = self.start;
        derived.accepting = self.accepting.clone();
        derived.strict = self.strict;
        for (_, arc) in self.arcs() {
            let (input, output) = f(arc);
            if derived.can_add_arc(arc.source, arc.target, &input) {
                derived.add_arc(arc.source, arc.target, input, output);
            } else {
                tracing::debug!("map_arcs drops arc {} colliding under new labels", arc.show());
            }
        }
        derived
    }

    /// Derives a new graph by relabeling every node through the pure function `f`. Arcs
    /// whose image would duplicate an occupied `(source, input)` slot are silently skipped;
    /// this legitimately happens when `f` collapses several nodes onto one.
    pub fn map_nodes<F>(&self, f: F) -> TransducerGraph<S>
    where
        F: Fn(NodeId) -> NodeId,
    {
        let mut derived = TransducerGraph::new();
        let highest = self
            .nodes()
            .iter()
            .map(|&n| f(n).0)
            .max()
            .map_or(0, |m| m + 1);
        derived.node_count = highest.max(self.node_count);
        derived.start = self.start.map(&f);
        derived.accepting = self.accepting.iter().map(|&n| f(n)).collect();
        derived.strict = self.strict;
        for (_, arc) in self.arcs() {
            let (source, target) = (f(arc.source), f(arc.target));
            if derived.can_add_arc(source, target, &arc.input) {
                derived.add_arc(source, target, arc.input.clone(), arc.output.0);
            }
        }
        derived
    }
}

impl<S: Symbol> std::fmt::Debug for TransducerGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "start: {}, accepting: {{{}}}",
            self.start.map(|n| n.show()).unwrap_or_default(),
            self.accepting.iter().sorted().map(|n| n.show()).join(", ")
        )?;
        for (_, arc) in self
            .arcs()
            .sorted_by_key(|(_, a)| (a.source, a.input.clone()))
        {
            writeln!(f, "{}", arc.show())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_node_graph() -> (TransducerGraph<char>, [NodeId; 3]) {
        let mut g = TransducerGraph::new();
        let q0 = g.add_node();
        let q1 = g.add_node();
        let q2 = g.add_node();
        g.set_start(q0);
        g.mark_accepting(q2);
        assert!(g.add_arc(q0, q1, 'a', 1.0));
        assert!(g.add_arc(q1, q2, 'b', 2.0));
        assert!(g.add_arc(q0, q2, 'c', 3.0));
        (g, [q0, q1, q2])
    }

    #[test]
    fn duplicate_arc_is_rejected() {
        let (mut g, [q0, q1, _]) = three_node_graph();
        assert!(!g.add_arc(q0, q1, 'a', 9.0));
        assert_eq!(g.arc_count(), 3);
        // weight of the original arc is untouched
        let id = g.arc_by_source_and_input(q0, &'a').unwrap();
        assert_eq!(g.arc(id).unwrap().output(), Weight(1.0));
    }

    #[test]
    fn determinism_violation_is_rejected() {
        let (mut g, [q0, _, q2]) = three_node_graph();
        assert!(!g.can_add_arc(q0, q2, &'a'));
        assert!(!g.add_arc(q0, q2, 'a', 1.0));
        assert!(g.is_deterministic());
    }

    #[test]
    #[should_panic(expected = "determinism violation")]
    fn strict_graph_panics_on_violation() {
        let mut g = TransducerGraph::strict();
        let q0 = g.add_node();
        let q1 = g.add_node();
        let q2 = g.add_node();
        g.add_arc(q0, q1, 'a', 1.0);
        g.add_arc(q0, q2, 'a', 1.0);
    }

    #[test]
    fn unallocated_endpoint_is_rejected() {
        let (mut g, [q0, ..]) = three_node_graph();
        assert!(!g.add_arc(q0, NodeId(17), 'z', 1.0));
        assert_eq!(g.arc_count(), 3);
    }

    #[test]
    fn removal_updates_all_indices() {
        let (mut g, [q0, q1, _]) = three_node_graph();
        let id = g.arc_by_source_and_input(q0, &'a').unwrap();
        assert!(g.remove_arc(id));
        assert!(!g.remove_arc(id));
        assert_eq!(g.arc_count(), 2);
        assert_eq!(g.arcs_by_source(q0).count(), 1);
        assert_eq!(g.arcs_by_target(q1).count(), 0);
        assert_eq!(g.arcs_by_input(&'a').count(), 0);
        assert!(g.arc_by_source_and_input(q0, &'a').is_none());
        assert_eq!(g.arcs_by_target_and_input(q1, &'a').count(), 0);
        // the slot is free again
        assert!(g.add_arc(q0, q1, 'a', 5.0));
    }

    #[test]
    fn queries_are_empty_for_unknown_keys() {
        let (g, _) = three_node_graph();
        let stranger = NodeId(99);
        assert_eq!(g.arcs_by_source(stranger).count(), 0);
        assert_eq!(g.arcs_by_target(stranger).count(), 0);
        assert_eq!(g.arcs_by_input(&'x').count(), 0);
        assert!(g.arc_by_source_and_input(stranger, &'a').is_none());
    }

    #[test]
    fn nodes_is_endpoint_union_plus_start() {
        let mut g: TransducerGraph<char> = TransducerGraph::new();
        let q0 = g.add_node();
        let isolated = g.add_node();
        g.set_start(q0);
        g.mark_accepting(isolated);
        // the isolated accepting node is invisible, the start node is not
        assert_eq!(g.nodes().into_iter().collect::<Vec<_>>(), vec![q0]);
        let q2 = g.add_node();
        g.add_arc(q0, q2, 'a', 1.0);
        assert_eq!(g.nodes().len(), 2);
    }

    #[test]
    fn increment_accumulates_weight() {
        let (mut g, [q0, q1, _]) = three_node_graph();
        assert!(g.increment_arc(q0, q1, 'a', 2.5));
        let id = g.arc_by_source_and_input(q0, &'a').unwrap();
        assert_eq!(g.arc(id).unwrap().output(), Weight(3.5));
        assert_eq!(g.arc_count(), 3);
    }

    #[test]
    fn path_weight_follows_start_to_accepting() {
        let (g, _) = three_node_graph();
        assert_eq!(g.path_weight(&['a', 'b']), Some(3.0));
        assert_eq!(g.path_weight(&['c']), Some(3.0));
        // ends on non-accepting node
        assert_eq!(g.path_weight(&['a']), None);
        // leaves the graph
        assert_eq!(g.path_weight(&['b']), None);
    }

    #[test]
    fn clone_does_not_alias_arcs() {
        let (g, [q0, _, _]) = three_node_graph();
        let mut copy = g.clone();
        let id = copy.arc_by_source_and_input(q0, &'a').unwrap();
        copy.set_arc_weight(id, 42.0);
        let original = g.arc(g.arc_by_source_and_input(q0, &'a').unwrap()).unwrap();
        assert_eq!(original.output(), Weight(1.0));
    }

    #[test]
    fn map_nodes_collapses_and_drops_conflicts() {
        let (g, [q0, q1, q2]) = three_node_graph();
        // merge q1 into q0; the 'a' self-loop survives, the arcs stay deterministic
        let merged = g.map_nodes(|n| if n == q1 { q0 } else { n });
        assert!(merged.is_deterministic());
        assert_eq!(merged.start(), Some(q0));
        assert!(merged.is_accepting(q2));
        assert_eq!(merged.arc_count(), 3);
        assert_eq!(
            merged
                .arc(merged.arc_by_source_and_input(q0, &'a').unwrap())
                .unwrap()
                .target(),
            q0
        );
    }

    #[test]
    fn arc_completeness() {
        let mut g = TransducerGraph::new();
        let q0 = g.add_node();
        let q1 = g.add_node();
        g.set_start(q0);
        g.mark_accepting(q1);
        g.add_arc(q0, q1, 'a', 1.0);
        g.add_arc(q0, q0, 'b', 1.0);
        assert!(!g.is_arc_complete());
        g.add_arc(q1, q0, 'a', 1.0);
        g.add_arc(q1, q1, 'b', 1.0);
        assert!(g.is_arc_complete());
    }
}
