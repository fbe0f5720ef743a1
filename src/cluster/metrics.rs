//! Cluster statistics and metrics

use crate::cluster::Cluster;
use crate::graph::{Graph, NodeId};
use itertools::Itertools;
use statrs::statistics::Statistics;

/// Calculate density (actual edges / potential edges) of `members` inside `graph`
///
/// Members missing from `graph` still count toward the potential edges.
pub fn calculate_density(graph: &Graph, members: &[NodeId]) -> f32 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }

    let potential_edges = n * (n - 1) / 2;

    let positions: Vec<usize> = members.iter().filter_map(|&id| graph.index_of(id)).collect();
    let actual_edges = positions
        .iter()
        .tuple_combinations()
        .filter(|&(&a, &b)| graph.has_edge(a, b as u32))
        .count();

    actual_edges as f32 / potential_edges as f32
}

/// Standard deviation of cluster sizes; lower means more balanced
pub fn balance_score(clusters: &[Cluster]) -> f64 {
    if clusters.is_empty() {
        return 0.0;
    }
    clusters
        .iter()
        .map(|c| c.size() as f64)
        .collect::<Vec<f64>>()
        .population_std_dev()
}
