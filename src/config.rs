//! Configuration management for the community influencer analysis

use crate::centrality::CentralityMode;
use crate::cluster::grouping::GroupingStrategy;
use std::ops::{Range, RangeInclusive};

/// Default configuration for a single analysis run
#[derive(Debug, Clone)]
pub struct Config {
    /// Stop flow iteration once successive matrices differ by less than this
    pub flow_tolerance: f64,

    /// Iteration cap for flow clustering
    pub flow_max_iterations: usize,

    /// Entries below this value are pruned after inflation
    pub pruning_threshold: f64,

    /// Diagonal weight written before the first normalization
    pub loop_weight: f64,

    /// Expansion factors swept by the flow search
    pub expansion_range: RangeInclusive<u32>,

    /// Inflation factors swept by the flow search, in tenths (15 => 1.5)
    pub inflation_tenths: Range<u32>,

    /// Cluster counts swept by the spectral search
    pub k_range: RangeInclusive<usize>,

    /// Seed threaded through every stochastic step
    pub seed: u64,

    /// How embedded points are grouped in spectral clustering
    pub grouping: GroupingStrategy,

    /// Clusters with this many nodes or fewer are discarded
    pub min_community_size: usize,

    /// Centrality used when ranking influencers
    pub centrality: CentralityMode,

    /// Power iteration cap for eigenvector centrality
    pub centrality_max_iterations: usize,

    /// Power iteration tolerance for eigenvector centrality
    pub centrality_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flow_tolerance: 1e-6,
            flow_max_iterations: 100,
            pruning_threshold: 1e-3,
            loop_weight: 1.0,
            expansion_range: 2..=4,
            inflation_tenths: 15..26,
            k_range: 2..=8,
            seed: 42,
            grouping: GroupingStrategy::KMeans,
            min_community_size: 4,
            centrality: CentralityMode::Degree,
            centrality_max_iterations: 100,
            centrality_tolerance: 1e-6,
        }
    }
}

impl Config {
    /// Create a new configuration with custom search ranges, keeping numeric defaults
    pub fn new(
        expansion_range: RangeInclusive<u32>,
        inflation_tenths: Range<u32>,
        k_range: RangeInclusive<usize>,
        min_community_size: usize,
    ) -> Self {
        Self {
            expansion_range,
            inflation_tenths,
            k_range,
            min_community_size,
            ..Self::default()
        }
    }
}
