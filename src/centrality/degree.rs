//! Degree centrality

use crate::centrality::CentralityScores;
use crate::graph::Graph;

/// Fraction of the other `n - 1` nodes each node is adjacent to
pub fn degree_centrality(graph: &Graph) -> CentralityScores {
    let n = graph.node_count;
    if n < 2 {
        return graph.node_ids.iter().map(|&id| (id, 0.0)).collect();
    }

    let scale = 1.0 / (n - 1) as f64;
    (0..n)
        .map(|node| (graph.node_ids[node], graph.degree(node) as f64 * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_center_is_one() {
        let g = Graph::from_edges(&[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let scores = degree_centrality(&g);
        assert_eq!(scores[&0], 1.0);
        assert!((scores[&3] - 0.2).abs() < 1e-12);
    }
}
