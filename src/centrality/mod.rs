//! Per-community centrality ranking

pub mod closeness;
pub mod degree;
pub mod eigenvector;

pub use closeness::closeness_centrality;
pub use degree::degree_centrality;
pub use eigenvector::{eigenvector_centrality, EigenvectorConfig};

use crate::cluster::filter::Community;
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::graph::{Graph, NodeId};
use petgraph::graph::{DiGraph, UnGraph};
use serde::Serialize;
use std::collections::BTreeMap;

/// Node score for one community and one centrality mode, iterated by ascending node id
pub type CentralityScores = BTreeMap<NodeId, f64>;

/// Which centrality decides the most influential node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CentralityMode {
    Degree,
    Closeness,
    Eigenvector,
}

impl CentralityMode {
    pub const ALL: [CentralityMode; 3] = [
        CentralityMode::Degree,
        CentralityMode::Closeness,
        CentralityMode::Eigenvector,
    ];

    /// Score every node of `graph` under this mode
    ///
    /// Graphs with fewer than two nodes score every node 0.
    pub fn scores(&self, graph: &Graph, eigenvector: EigenvectorConfig) -> CentralityScores {
        match self {
            CentralityMode::Degree => degree_centrality(graph),
            CentralityMode::Closeness => closeness_centrality(graph),
            CentralityMode::Eigenvector => eigenvector_centrality(graph, eigenvector),
        }
    }
}

/// Highest-scoring node; equal scores go to the lowest node id
pub fn top_node(scores: &CentralityScores) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (&id, &score) in scores {
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Selects the most influential node of each community
#[derive(Debug, Clone)]
pub struct CentralityRanker {
    pub mode: CentralityMode,
    pub eigenvector: EigenvectorConfig,
}

impl CentralityRanker {
    pub fn new(mode: CentralityMode) -> Self {
        Self {
            mode,
            eigenvector: EigenvectorConfig::default(),
        }
    }

    pub fn from_config(config: &Config, mode: CentralityMode) -> Self {
        Self {
            mode,
            eigenvector: EigenvectorConfig {
                max_iterations: config.centrality_max_iterations,
                tolerance: config.centrality_tolerance,
            },
        }
    }

    /// Most influential node of `graph`
    ///
    /// Fails with [`AnalysisError::EmptyCommunity`] for fewer than two nodes.
    pub fn top_node(&self, graph: &Graph) -> Result<NodeId> {
        if graph.node_count < 2 {
            return Err(AnalysisError::EmptyCommunity {
                size: graph.node_count,
            });
        }
        top_node(&self.mode.scores(graph, self.eigenvector)).ok_or(AnalysisError::EmptyCommunity {
            size: graph.node_count,
        })
    }

    /// One node per community, in community order
    pub fn rank(&self, communities: &[Community]) -> Result<Vec<NodeId>> {
        communities
            .iter()
            .map(|community| {
                let top = self.top_node(&community.graph)?;
                log::debug!(
                    "Community {} ({} nodes): {:?} influencer {}",
                    community.cluster_id,
                    community.size(),
                    self.mode,
                    top
                );
                Ok(top)
            })
            .collect()
    }
}

/// Undirected petgraph view; node index i is graph position i
pub(crate) fn to_undirected(graph: &Graph) -> UnGraph<NodeId, ()> {
    let mut pg = UnGraph::with_capacity(graph.node_count, graph.edge_count());
    for &id in &graph.node_ids {
        pg.add_node(id);
    }
    pg.extend_with_edges(graph_edges(graph).filter(|(a, b)| a < b));
    pg
}

/// Directed petgraph view with both orientations of every edge
pub(crate) fn to_mirrored_directed(graph: &Graph) -> DiGraph<NodeId, ()> {
    let mut pg = DiGraph::with_capacity(graph.node_count, graph.edges.len());
    for &id in &graph.node_ids {
        pg.add_node(id);
    }
    pg.extend_with_edges(graph_edges(graph));
    pg
}

fn graph_edges(graph: &Graph) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..graph.node_count).flat_map(move |src| {
        graph
            .neighbors(src)
            .iter()
            .map(move |&dst| (src as u32, dst))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_edges(&[(3, 2), (2, 1), (1, 3)])
    }

    #[test]
    fn test_triangle_ties_go_to_lowest_id() {
        let graph = triangle();
        for mode in [CentralityMode::Degree, CentralityMode::Closeness] {
            let scores = mode.scores(&graph, EigenvectorConfig::default());
            assert!(scores.values().all(|&s| s == 1.0));
            assert_eq!(CentralityRanker::new(mode).top_node(&graph).unwrap(), 1);
        }
    }

    #[test]
    fn test_star_center_wins_every_mode() {
        let graph = Graph::from_edges(&[(10, 1), (10, 2), (10, 3), (10, 4), (10, 5)]);
        for mode in CentralityMode::ALL {
            assert_eq!(CentralityRanker::new(mode).top_node(&graph).unwrap(), 10);
        }
    }

    #[test]
    fn test_tiny_communities_are_reported() {
        let single = Graph::from_parts(&[7], &[]).unwrap();
        let empty = Graph::from_parts(&[], &[]).unwrap();
        let ranker = CentralityRanker::new(CentralityMode::Degree);

        assert_eq!(
            ranker.top_node(&single),
            Err(AnalysisError::EmptyCommunity { size: 1 })
        );
        assert_eq!(
            ranker.top_node(&empty),
            Err(AnalysisError::EmptyCommunity { size: 0 })
        );
        assert_eq!(degree_centrality(&single)[&7], 0.0);
        assert!(closeness_centrality(&empty).is_empty());
    }

    #[test]
    fn test_top_node_empty_scores() {
        assert_eq!(top_node(&CentralityScores::new()), None);
    }

    #[test]
    fn test_petgraph_views_match_edge_count() {
        let graph = triangle();
        assert_eq!(to_undirected(&graph).edge_count(), 3);
        assert_eq!(to_mirrored_directed(&graph).edge_count(), 6);
    }
}
