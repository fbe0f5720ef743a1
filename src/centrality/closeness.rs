//! Closeness centrality
//!
//! ```text
//! C(v) = (r - 1) / sum_u d(v, u) * (r - 1) / (n - 1)
//! ```
//!
//! where `r` counts the nodes reachable from `v` (itself included). The
//! second factor scales down nodes stuck in small components, so the score
//! stays comparable across a disconnected community.

use crate::centrality::{to_undirected, CentralityScores};
use crate::graph::Graph;
use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;

/// Inverse average shortest-path distance to every reachable node
pub fn closeness_centrality(graph: &Graph) -> CentralityScores {
    let n = graph.node_count;
    if n < 2 {
        return graph.node_ids.iter().map(|&id| (id, 0.0)).collect();
    }

    let pg = to_undirected(graph);
    (0..n)
        .map(|node| {
            let distances = dijkstra(&pg, NodeIndex::new(node), None, |_| 1usize);
            let total: usize = distances.values().sum();
            let reachable = distances.len() as f64 - 1.0;
            let score = if total > 0 {
                (reachable / total as f64) * (reachable / (n - 1) as f64)
            } else {
                0.0
            };
            (graph.node_ids[node], score)
        })
        .collect()
}
