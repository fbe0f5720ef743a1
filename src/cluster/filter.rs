//! Community post-processing: size filter and subgraph materialization

use crate::cluster::Cluster;
use crate::error::Result;
use crate::graph::Graph;

/// A surviving cluster materialized as its induced subgraph
#[derive(Debug, Clone)]
pub struct Community {
    /// Id of the cluster this community came from
    pub cluster_id: u32,
    pub graph: Graph,
}

impl Community {
    pub fn size(&self) -> usize {
        self.graph.node_count
    }
}

/// Keep clusters with more than `min_size` members, preserving order
pub fn filter_clusters(clusters: &[Cluster], min_size: usize) -> Vec<Cluster> {
    clusters
        .iter()
        .filter(|cluster| cluster.size() > min_size)
        .cloned()
        .collect()
}

/// Filter `clusters` by size and build the induced subgraph of each survivor
pub fn filter_communities(graph: &Graph, clusters: &[Cluster], min_size: usize) -> Result<Vec<Community>> {
    let kept = filter_clusters(clusters, min_size);
    log::info!(
        "Keeping {} of {} clusters with more than {} members",
        kept.len(),
        clusters.len(),
        min_size
    );

    kept.iter()
        .map(|cluster| {
            Ok(Community {
                cluster_id: cluster.id,
                graph: graph.induced_subgraph(&cluster.members)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_strict_and_ordered() {
        let clusters = vec![
            Cluster::new(0, vec![1, 2, 3, 4, 5]),
            Cluster::new(1, vec![6, 7, 8, 9]),
            Cluster::new(2, vec![10, 11, 12, 13, 14, 15]),
        ];
        let kept = filter_clusters(&clusters, 4);
        assert_eq!(kept.iter().map(|c| c.id).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(filter_clusters(&kept, 4), kept);
    }

    #[test]
    fn test_communities_are_induced() {
        let graph = Graph::from_edges(&[(1, 2), (2, 3), (3, 1), (3, 4), (4, 5)]);
        let clusters = vec![Cluster::new(0, vec![1, 2, 3]), Cluster::new(1, vec![4, 5])];
        let communities = filter_communities(&graph, &clusters, 2).unwrap();
        assert_eq!(communities.len(), 1);
        assert_eq!(communities[0].cluster_id, 0);
        assert_eq!(communities[0].graph.edge_count(), 3);
    }

    #[test]
    fn test_unknown_member_fails() {
        let graph = Graph::from_edges(&[(1, 2)]);
        let clusters = vec![Cluster::new(0, vec![1, 2, 9])];
        assert!(filter_communities(&graph, &clusters, 0).is_err());
    }
}
