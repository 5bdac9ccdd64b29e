use itertools::Itertools;

use crate::{graph::TransducerGraph, Show, Symbol};

impl<S: Symbol> TransducerGraph<S> {
    /// Computes the graphviz representation of the graph, for more information on the DOT
    /// format, see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    /// Accepting nodes are drawn as double circles, the start node with a bold outline.
    /// Nodes and arcs are emitted in sorted order so the output is reproducible.
    pub fn dot_representation(&self) -> String {
        let header = [
            "digraph transducer {".to_string(),
            "rankdir=LR".to_string(),
        ];

        let nodes = self.nodes().into_iter().map(|node| {
            let shape = if self.is_accepting(node) {
                "doublecircle"
            } else {
                "circle"
            };
            let style = if self.start() == Some(node) {
                ", style=bold"
            } else {
                ""
            };
            format!("{} [shape={}{}]", node.show(), shape, style)
        });

        let arcs = self
            .arcs()
            .map(|(_, arc)| arc)
            .sorted_by(|a, b| {
                (a.source(), a.input(), a.target()).cmp(&(b.source(), b.input(), b.target()))
            })
            .map(|arc| {
                format!(
                    "{} -> {} [label=\"{}/{}\"]",
                    arc.source().show(),
                    arc.target().show(),
                    arc.input().show(),
                    arc.output().show()
                )
            });

        header
            .into_iter()
            .chain(nodes)
            .chain(arcs)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Projects the graph onto the AT&T FSM text convention: one
    /// `source<TAB>target<TAB>input<TAB>weight` line per arc, followed by one
    /// `state<TAB>final-weight` line per accepting node (the final weight of this model is
    /// always zero). A write-only projection, there is no parser for it.
    pub fn att_representation(&self) -> String {
        let arcs = self
            .arcs()
            .map(|(_, arc)| arc)
            .sorted_by(|a, b| {
                (a.source(), a.input(), a.target()).cmp(&(b.source(), b.input(), b.target()))
            })
            .map(|arc| {
                format!(
                    "{}\t{}\t{}\t{}",
                    arc.source().index(),
                    arc.target().index(),
                    arc.input().show(),
                    arc.output().0
                )
            });
        let finals = self
            .accepting()
            .iter()
            .sorted()
            .map(|node| format!("{}\t{}", node.index(), 0.0));
        arcs.chain(finals).join("\n")
    }

    /// Renders the graph visually (as PNG) and returns the bytes of the rendered image.
    /// This method is only available on the `graphviz` crate feature and requires a `dot`
    /// binary on the path.
    #[cfg(feature = "graphviz")]
    pub fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Read, Write};
        use tracing::trace;

        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(std::io::Error::other(format!(
                "dot process exited with status: {}",
                status
            )));
        }

        Ok(output)
    }

    /// Attempts to render the graph to a PNG file with the given filename. This method is
    /// only available on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;
        use tracing::trace;

        trace!("outputting dot and rendering to png");
        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;
        tempfile.write_all(dot.as_bytes())?;

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile.path())
            .spawn()?;
        if !child.wait()?.success() {
            return Err(std::io::Error::other("dot exited with failure"));
        }
        Ok(())
    }
}
