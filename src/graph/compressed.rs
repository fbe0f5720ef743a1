//! Compressed undirected graph representation

use crate::error::{AnalysisError, Result};
use crate::graph::components::DisjointSets;
use std::collections::HashMap;
use std::mem;

/// External node identifier
pub type NodeId = i64;

/// Compressed sparse representation of an undirected graph
///
/// Every edge is stored in both endpoint rows, so `edges.len()` is twice the
/// number of undirected edges. Node positions follow insertion order and are
/// the stable ordering used by every matrix built from the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: offsets[i] to offsets[i+1] defines the neighbor range for node i
    pub offsets: Vec<u32>,

    /// Concatenated sorted neighbor lists (node positions)
    pub edges: Vec<u32>,

    /// Mapping from node positions to external identifiers
    pub node_ids: Vec<NodeId>,

    index: HashMap<NodeId, u32>,
}

impl Graph {
    pub(crate) fn from_raw(offsets: Vec<u32>, edges: Vec<u32>, node_ids: Vec<NodeId>) -> Self {
        let index = node_ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();

        Self {
            node_count: node_ids.len(),
            offsets,
            edges,
            node_ids,
            index,
        }
    }

    /// Build a graph from an explicit node set and edge list
    ///
    /// Duplicate nodes and multi-edges are collapsed, self-loops are dropped.
    /// Fails with [`AnalysisError::InvalidEdge`] if an edge references a node
    /// outside `nodes`.
    pub fn from_parts(nodes: &[NodeId], edges: &[(NodeId, NodeId)]) -> Result<Self> {
        let mut builder = super::GraphBuilder::with_capacity(nodes.len());
        for &node in nodes {
            builder.add_node(node);
        }
        for &(a, b) in edges {
            builder.add_edge(a, b)?;
        }
        Ok(builder.build())
    }

    /// Build a graph whose node set is exactly the edge endpoints, in first-appearance order
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let mut builder = super::GraphBuilder::with_capacity(edges.len());
        for &(a, b) in edges {
            builder.connect(a, b);
        }
        builder.build()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Position of a node in the stable ordering
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).map(|&i| i as usize)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Neighbor positions of the node at `node`
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    /// Neighbor identifiers of the node `id`
    pub fn neighbor_ids(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self
            .index_of(id)
            .ok_or_else(|| AnalysisError::InvalidGraph(format!("unknown node {}", id)))?;
        Ok(self
            .neighbors(node)
            .iter()
            .map(|&n| self.node_ids[n as usize])
            .collect())
    }

    pub fn degree(&self, node: usize) -> usize {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        end - start
    }

    /// Check if there's an edge between two node positions
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.neighbors(src).binary_search(&dst).is_ok()
    }

    /// Restrict the graph to `members` and the edges between them
    ///
    /// Retained nodes keep their relative order from this graph regardless of
    /// the order of `members`.
    pub fn induced_subgraph(&self, members: &[NodeId]) -> Result<Graph> {
        let mut keep = vec![false; self.node_count];
        for &id in members {
            let node = self.index_of(id).ok_or_else(|| {
                AnalysisError::InvalidGraph(format!("subgraph member {} is not in the graph", id))
            })?;
            keep[node] = true;
        }

        // Create mapping from original to subgraph positions
        let mut orig_to_sub = vec![u32::MAX; self.node_count];
        let mut node_ids = Vec::new();
        for node in 0..self.node_count {
            if keep[node] {
                orig_to_sub[node] = node_ids.len() as u32;
                node_ids.push(self.node_ids[node]);
            }
        }

        let mut offsets = Vec::with_capacity(node_ids.len() + 1);
        offsets.push(0);
        let mut edges = Vec::new();

        for node in 0..self.node_count {
            if !keep[node] {
                continue;
            }
            // Parent rows are sorted and the remap is monotone, so rows stay sorted
            for &target in self.neighbors(node) {
                if keep[target as usize] {
                    edges.push(orig_to_sub[target as usize]);
                }
            }
            offsets.push(edges.len() as u32);
        }

        Ok(Graph::from_raw(offsets, edges, node_ids))
    }

    /// Connected components as node identifier lists, ordered by first member position
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut sets = DisjointSets::new(self.node_count);
        for src in 0..self.node_count {
            for &dst in self.neighbors(src) {
                sets.union(src as u32, dst);
            }
        }
        sets.groups()
            .into_iter()
            .map(|group| group.into_iter().map(|n| self.node_ids[n as usize]).collect())
            .collect()
    }

    /// Induced subgraph of the largest connected component (first one on ties)
    pub fn largest_component(&self) -> Graph {
        let components = self.connected_components();
        let mut best: Option<&Vec<NodeId>> = None;
        for component in &components {
            if best.map_or(true, |b| component.len() > b.len()) {
                best = Some(component);
            }
        }
        match best {
            Some(members) => self
                .induced_subgraph(members)
                .unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();
        let ids = self.node_ids.capacity() * mem::size_of::<NodeId>();
        let index = self.index.capacity() * (mem::size_of::<NodeId>() + mem::size_of::<u32>());

        base + offsets + edges + ids + index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Graph {
        Graph::from_parts(&[10, 20, 30, 40], &[(10, 20), (20, 30), (30, 40)]).unwrap()
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let g = path();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbor_ids(20).unwrap(), vec![10, 30]);
        assert_eq!(g.neighbor_ids(10).unwrap(), vec![20]);
        assert!(g.neighbor_ids(99).is_err());
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn test_unknown_edge_endpoint_rejected() {
        let err = Graph::from_parts(&[1, 2], &[(1, 3)]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InvalidEdge {
                source_node: 1,
                target_node: 3,
                missing: 3
            }
        );
    }

    #[test]
    fn test_multi_edges_and_loops_collapsed() {
        let g = Graph::from_parts(&[1, 2], &[(1, 2), (2, 1), (1, 2), (1, 1)]).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(0), 1);
    }

    #[test]
    fn test_induced_subgraph_preserves_parent_order() {
        let g = path();
        let sub = g.induced_subgraph(&[40, 20, 30]).unwrap();
        assert_eq!(sub.node_ids, vec![20, 30, 40]);
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.neighbor_ids(30).unwrap(), vec![20, 40]);
        assert!(g.induced_subgraph(&[5]).is_err());
    }

    #[test]
    fn test_components_and_largest() {
        let g = Graph::from_parts(&[1, 2, 3, 4, 5, 6], &[(1, 2), (3, 4), (4, 5)]).unwrap();
        assert_eq!(
            g.connected_components(),
            vec![vec![1, 2], vec![3, 4, 5], vec![6]]
        );
        assert_eq!(g.largest_component().node_ids, vec![3, 4, 5]);
    }
}
