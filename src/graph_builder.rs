use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{GraphError, Result};
use crate::similarity::ScoreMatrix;

/// Undirected, unweighted similarity network. Node weights are entity labels.
pub type SimilarityGraph = UnGraph<String, ()>;

/// Build the graph: one vertex per label, in order, and an edge for every
/// pair whose score is strictly above `threshold`.
///
/// Vertices without any qualifying pair are kept.
pub fn assemble(labels: &[String], scores: &ScoreMatrix, threshold: f64) -> Result<SimilarityGraph> {
    if labels.len() != scores.dimension() {
        return Err(GraphError::DimensionMismatch {
            labels: labels.len(),
            dimension: scores.dimension(),
        });
    }

    let mut graph = SimilarityGraph::with_capacity(labels.len(), 0);
    let nodes: Vec<NodeIndex> = labels
        .iter()
        .map(|label| graph.add_node(label.clone()))
        .collect();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if scores.get(i, j).is_some_and(|score| score > threshold) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    debug!(
        "assembled graph with {} vertices and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
