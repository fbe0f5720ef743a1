//! Core library for finding locally influential nodes in community structure

pub mod centrality;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod pipeline;

pub use centrality::CentralityMode;
pub use cluster::Cluster;
pub use config::Config;
pub use error::{AnalysisError, Result};
pub use graph::{Graph, NodeId};
pub use pipeline::{
    rank_influencers, run_community_detection_alt, run_flow_clustering, run_spectral_clustering,
};
