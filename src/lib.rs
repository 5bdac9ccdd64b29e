//! Library for working with weighted finite-state transducer graphs.
//!
//! The central type is [`TransducerGraph`](graph::TransducerGraph), a deterministic weighted
//! automaton stored as an arena of arcs together with five derived indices (by source, by
//! target, by input symbol, by source and input, by target and input). A graph is grown arc
//! by arc, either directly through [`graph::TransducerGraph::add_arc`] or from a multiset of
//! weighted symbol sequences via [`builder::build_from_paths`]. Nodes are opaque
//! [`graph::NodeId`] handles allocated by the graph itself, they carry no structural meaning
//! beyond identity.
//!
//! On top of the graph representation, the crate provides
//! - [`push::quasi_determinize`], which redistributes arc weights so that weight divergence
//!   between paths sharing a prefix happens as early as possible, without changing any total
//!   path weight. This is the canonical preparation step before minimizing a weighted graph.
//! - three minimization strategies behind the [`minimize::Minimize`] trait: a quadratic
//!   pairwise-distinguishability oracle ([`minimize::PairwiseMinimizer`]) and two
//!   partition-refinement implementations with Hopcroft-style smaller-half splitting
//!   ([`minimize::RefinementMinimizer`] and [`minimize::BlockMinimizer`]).
//! - processor combinators which derive new graphs by mapping arcs or relabeling nodes, in
//!   particular the [`graph::processors::fold_weights`]/[`graph::processors::split_weights`]
//!   pair that folds arc weights into the input label (minimization only respects input
//!   equality) and splits them back out afterwards.
//!
//! Text projections to the DOT and AT&T FSM formats live in [`dot`], random graph and path
//! generation (gated behind the `random` feature) in [`random`].
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use transducer::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        builder::{build_from_paths, GraphBuilder},
        graph::{
            processors::{fold_weights, split_weights, FoldedLabel},
            Arc, ArcId, NodeId, TransducerGraph, Weight,
        },
        math,
        minimize::{BlockMinimizer, Minimize, PairwiseMinimizer, RefinementMinimizer},
        push::quasi_determinize,
        Show, Symbol,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout
/// the crate and do not really fit to the top level.
pub mod math;

/// Definition of the arc arena, the indexed graph representation and the processors which
/// derive new graphs from existing ones.
pub mod graph;

/// Construction of graphs from collections of weighted paths.
pub mod builder;

/// Quasi-determinization, i.e. canonicalization of the weight distribution along paths.
pub mod push;

/// Contains implementations of different minimization algorithms.
pub mod minimize;

/// Plain-text projections of graphs (DOT and AT&T FSM edge lists).
pub mod dot;

/// Implements the generation of random graphs and random accepting paths.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// An input symbol is anything that can label an arc. The `Ord` requirement is not
/// incidental: the quasi-determinizer breaks ties between equally short paths in favour of
/// the smaller input symbol, which makes its output reproducible across runs.
pub trait Symbol: Clone + Eq + Hash + Ord + Debug + Show {}

impl<S: Clone + Eq + Hash + Ord + Debug + Show> Symbol for S {}

/// Helper trait which can be used to display nodes, arcs and such. Just use something
/// that makes sense, this is mainly used by the text projections and for debugging.
pub trait Show {
    /// Returns a human readable representation of `self`.
    fn show(&self) -> String;
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for &str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
