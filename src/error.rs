//! Error types for the analysis core

use crate::graph::NodeId;
use thiserror::Error;

/// Errors surfaced by graph construction, clustering and ranking
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// An edge endpoint is not part of the node set
    #[error("edge ({source_node}, {target_node}) references unknown node {missing}")]
    InvalidEdge {
        source_node: NodeId,
        target_node: NodeId,
        missing: NodeId,
    },

    /// Malformed node references outside of edge construction
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Non-square, negative or non-finite matrix input
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    /// Spectral embedding is ill-defined for a disconnected graph
    #[error("degenerate spectral embedding: graph has {components} connected components")]
    DegenerateEmbedding { components: usize },

    /// Centrality is undefined or trivial for communities with fewer than two nodes
    #[error("community with {size} node(s) has no defined top node")]
    EmptyCommunity { size: usize },

    /// Out-of-range hyperparameter or empty parameter range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AnalysisError>;
