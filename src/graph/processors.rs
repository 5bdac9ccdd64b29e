use crate::{
    graph::{TransducerGraph, Weight},
    Show, Symbol,
};

/// Input label carrying the original symbol together with the arc weight. Produced by
/// [`fold_weights`] so that minimization, which only respects input-symbol equality, also
/// distinguishes states by the weights of their outgoing arcs.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FoldedLabel<S> {
    /// The original input symbol.
    pub input: S,
    /// The weight the arc carried before folding.
    pub output: Weight,
}

impl<S: Show> Show for FoldedLabel<S> {
    fn show(&self) -> String {
        format!("{}/{}", self.input.show(), self.output.show())
    }
}

/// Folds every arc's output weight into its input label, leaving the arc weight at zero.
/// The exact inverse is [`split_weights`]; round-tripping the two is the identity
/// transform up to arc handles.
pub fn fold_weights<S: Symbol>(graph: &TransducerGraph<S>) -> TransducerGraph<FoldedLabel<S>> {
    graph.map_arcs(|arc| {
        (
            FoldedLabel {
                input: arc.input().clone(),
                output: arc.output(),
            },
            0.0,
        )
    })
}

/// Splits folded labels back apart, restoring the arc weights [`fold_weights`] absorbed.
pub fn split_weights<S: Symbol>(graph: &TransducerGraph<FoldedLabel<S>>) -> TransducerGraph<S> {
    graph.map_arcs(|arc| (arc.input().input.clone(), arc.input().output.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn fold_then_split_is_identity() {
        let g = GraphBuilder::default()
            .with_arcs([(0, 'a', 1.5, 1), (1, 'b', -2.0, 2), (0, 'b', 0.25, 2)])
            .with_accepting([2])
            .into_graph(0);
        let folded = fold_weights(&g);
        assert_eq!(folded.arc_count(), g.arc_count());
        assert!(folded.arcs().all(|(_, arc)| arc.output() == Weight::ZERO));
        let back = split_weights(&folded);
        assert_eq!(back.arc_count(), g.arc_count());
        for (_, arc) in g.arcs() {
            let id = back
                .arc_by_source_and_input(arc.source(), arc.input())
                .unwrap();
            let restored = back.arc(id).unwrap();
            assert_eq!(restored.target(), arc.target());
            assert_eq!(restored.output(), arc.output());
        }
        assert_eq!(back.start(), g.start());
        assert_eq!(back.accepting(), g.accepting());
    }

    #[test]
    fn folded_labels_distinguish_weights() {
        let a1 = FoldedLabel {
            input: 'a',
            output: Weight(1.0),
        };
        let a2 = FoldedLabel {
            input: 'a',
            output: Weight(2.0),
        };
        assert_ne!(a1, a2);
        assert!(a1 < a2);
    }
}
