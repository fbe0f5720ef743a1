//! Eigenvector centrality: importance via important neighbors.
//!
//! The community is viewed as a directed graph with every edge mirrored,
//! and the principal eigenvector of its adjacency is found by power
//! iteration on `A + I`. The identity shift keeps bipartite communities
//! (stars, even cycles) from oscillating without changing the eigenvectors.

use crate::centrality::{to_mirrored_directed, CentralityScores};
use crate::graph::Graph;
use petgraph::graph::NodeIndex;
use petgraph::Direction;

/// Configuration for eigenvector centrality.
#[derive(Debug, Clone, Copy)]
pub struct EigenvectorConfig {
    /// Maximum iterations before stopping.
    pub max_iterations: usize,
    /// Convergence tolerance per node (L1 change is compared to `n * tolerance`).
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Compute eigenvector centrality via power iteration, L2-normalized.
///
/// If the iteration cap is reached the last iterate is returned and a
/// warning is logged.
pub fn eigenvector_centrality(graph: &Graph, config: EigenvectorConfig) -> CentralityScores {
    let n = graph.node_count;
    if n < 2 {
        return graph.node_ids.iter().map(|&id| (id, 0.0)).collect();
    }

    let pg = to_mirrored_directed(graph);
    let mut scores = vec![1.0 / n as f64; n];
    let mut converged = false;

    for _ in 0..config.max_iterations {
        let mut next = scores.clone();
        for idx in pg.node_indices() {
            for pred in pg.neighbors_directed(idx, Direction::Incoming) {
                next[idx.index()] += scores[pred.index()];
            }
        }

        let norm: f64 = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for s in &mut next {
                *s /= norm;
            }
        }

        let diff: f64 = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        scores = next;
        if diff < n as f64 * config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Eigenvector centrality did not converge within {} iterations",
            config.max_iterations
        );
    }

    (0..n)
        .map(|node| (pg[NodeIndex::new(node)], scores[node]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eigenvector_star() {
        let g = Graph::from_edges(&[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let scores = eigenvector_centrality(&g, EigenvectorConfig::default());
        for leaf in 1..=5 {
            assert!(scores[&0] > scores[&leaf]);
        }
    }

    #[test]
    fn test_eigenvector_normalized() {
        let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)]);
        let scores = eigenvector_centrality(&g, EigenvectorConfig::default());
        let norm: f64 = scores.values().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!((scores[&1] - scores[&3]).abs() < 1e-6);
        assert!(scores[&1] > scores[&2]);
    }
}
