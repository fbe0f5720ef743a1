//! Community detection module

pub mod filter;
pub mod flow;
pub mod greedy;
pub mod grouping;
pub mod metrics;
pub mod modularity;
pub mod search;
pub mod spectral;

use crate::graph::{Graph, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A set of densely connected nodes produced by one clustering run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of this cluster in its result set
    pub id: u32,

    /// Members of this cluster, in graph order
    pub members: Vec<NodeId>,
}

impl Cluster {
    pub fn new(id: u32, members: Vec<NodeId>) -> Self {
        Self { id, members }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Turn groups of node positions into clusters numbered in the given order
pub fn clusters_from_groups(graph: &Graph, groups: Vec<Vec<u32>>) -> Vec<Cluster> {
    groups
        .into_iter()
        .enumerate()
        .map(|(id, group)| {
            let members = group
                .into_iter()
                .map(|node| graph.node_ids[node as usize])
                .collect();
            Cluster::new(id as u32, members)
        })
        .collect()
}

/// Convert a per-position label vector into explicit membership lists
///
/// Clusters are ordered by label; labels with no members produce no cluster.
pub fn clusters_from_labels(graph: &Graph, labels: &[usize]) -> Vec<Cluster> {
    let mut by_label: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
    for (node, &label) in labels.iter().enumerate() {
        by_label.entry(label).or_default().push(node as u32);
    }
    clusters_from_groups(graph, by_label.into_values().collect())
}

/// Whether `clusters` are non-empty, pairwise disjoint and cover every node of `graph`
pub fn is_hard_partition(graph: &Graph, clusters: &[Cluster]) -> bool {
    let mut seen = HashSet::with_capacity(graph.node_count);
    for cluster in clusters {
        if cluster.members.is_empty() {
            return false;
        }
        for &member in &cluster.members {
            if !graph.contains(member) || !seen.insert(member) {
                return false;
            }
        }
    }
    seen.len() == graph.node_count
}
