//! Entry points for an external orchestrator
//!
//! Graph -> clustering (driven by a parameter search) -> size filter ->
//! induced communities -> one influencer per community.

use crate::centrality::{CentralityMode, CentralityRanker};
use crate::cluster::filter::filter_communities;
use crate::cluster::greedy::greedy_modularity_communities;
use crate::cluster::search::{flow_grid_search, spectral_grid_search, FlowSearch, SpectralSearch};
use crate::cluster::Cluster;
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::graph::{Graph, NodeId};
use std::ops::{Range, RangeInclusive};

fn require_nodes(graph: &Graph) -> Result<()> {
    if graph.node_count == 0 {
        return Err(AnalysisError::InvalidGraph("graph has no nodes".to_string()));
    }
    Ok(())
}

/// Flow clustering at the modularity-maximizing (expansion, inflation) pair
pub fn run_flow_clustering(
    graph: &Graph,
    expansion_range: RangeInclusive<u32>,
    inflation_range: Range<u32>,
    config: &Config,
) -> Result<(Vec<Cluster>, FlowSearch)> {
    require_nodes(graph)?;
    flow_grid_search(graph, expansion_range, inflation_range, config)
}

/// Spectral clustering at the most balanced `k`
pub fn run_spectral_clustering(
    graph: &Graph,
    k_range: RangeInclusive<usize>,
    config: &Config,
) -> Result<(Vec<Cluster>, SpectralSearch)> {
    require_nodes(graph)?;
    spectral_grid_search(graph, k_range, config)
}

/// Greedy modularity baseline
pub fn run_community_detection_alt(graph: &Graph) -> Result<Vec<Cluster>> {
    require_nodes(graph)?;
    Ok(greedy_modularity_communities(graph))
}

/// Top influencer of every cluster with more than `min_community_size` members
pub fn rank_influencers(
    clusters: &[Cluster],
    graph: &Graph,
    mode: CentralityMode,
    min_community_size: usize,
    config: &Config,
) -> Result<Vec<NodeId>> {
    if min_community_size == 0 {
        return Err(AnalysisError::InvalidParameter(
            "minimum community size must be at least 1".to_string(),
        ));
    }
    let communities = filter_communities(graph, clusters, min_community_size)?;
    CentralityRanker::from_config(config, mode).rank(&communities)
}
