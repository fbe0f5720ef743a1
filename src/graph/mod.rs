//! Graph representation and matrix conversions

pub mod builder;
pub mod components;
pub mod compressed;
pub mod matrix;

pub use builder::GraphBuilder;
pub use compressed::{Graph, NodeId};
pub use matrix::{adjacency_matrix, laplacian_matrix};
