//! Graph construction module

use crate::error::{AnalysisError, Result};
use crate::graph::{Graph, NodeId};
use std::collections::HashMap;

/// Builder for incrementally constructing an undirected [`Graph`]
pub struct GraphBuilder {
    /// Mapping from external IDs to node positions
    id_to_index: HashMap<NodeId, u32>,

    /// Node IDs in insertion order
    node_ids: Vec<NodeId>,

    /// Adjacency lists for each node, both directions
    adjacency_lists: Vec<Vec<u32>>,

    /// Self-loops seen and ignored
    dropped_loops: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
            dropped_loops: 0,
        }
    }

    /// Get or create the position for the given node ID
    pub fn add_node(&mut self, id: NodeId) -> u32 {
        if let Some(&idx) = self.id_to_index.get(&id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id, idx);
        self.node_ids.push(id);
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        let lookup = |id: NodeId| {
            self.id_to_index
                .get(&id)
                .copied()
                .ok_or(AnalysisError::InvalidEdge {
                    source_node: a,
                    target_node: b,
                    missing: id,
                })
        };
        let src = lookup(a)?;
        let dst = lookup(b)?;
        self.link(src, dst);
        Ok(())
    }

    /// Add an undirected edge, creating missing endpoints
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        let src = self.add_node(a);
        let dst = self.add_node(b);
        self.link(src, dst);
    }

    fn link(&mut self, src: u32, dst: u32) {
        if src == dst {
            self.dropped_loops += 1;
            return;
        }
        self.adjacency_lists[src as usize].push(dst);
        self.adjacency_lists[dst as usize].push(src);
    }

    /// Build the compressed graph
    pub fn build(mut self) -> Graph {
        if self.dropped_loops > 0 {
            log::debug!("Dropped {} self-loop edges", self.dropped_loops);
        }

        let mut offsets = Vec::with_capacity(self.node_ids.len() + 1);
        offsets.push(0);

        let mut edges = Vec::new();
        for list in &mut self.adjacency_lists {
            // Sort for binary search and collapse multi-edges
            list.sort_unstable();
            list.dedup();
            edges.extend_from_slice(list);
            offsets.push(edges.len() as u32);
        }

        Graph::from_raw(offsets, edges, self.node_ids)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
