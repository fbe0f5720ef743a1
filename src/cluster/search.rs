//! Hyperparameter sweeps for the clustering engines
//!
//! Trials run in parallel but are merged in grid order, so the
//! first-encountered optimum wins exactly as in a sequential sweep.

use crate::cluster::flow::{FlowClusterer, FlowParams};
use crate::cluster::metrics::balance_score;
use crate::cluster::spectral::SpectralClusterer;
use crate::cluster::{clusters_from_groups, Cluster};
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::graph::{adjacency_matrix, Graph};
use itertools::iproduct;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::{Range, RangeInclusive};

/// One point of the flow parameter grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowTrial {
    pub expansion: u32,
    pub inflation: f64,
    pub modularity: f64,
    pub converged: bool,
    pub cluster_count: usize,
}

/// Trace and winner of a flow parameter sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSearch {
    pub best_expansion: u32,
    pub best_inflation: f64,
    pub best_modularity: f64,
    /// False when no trial scored above a zero modularity baseline
    pub improved: bool,
    pub trials: Vec<FlowTrial>,
}

/// Sweep expansion (inclusive) and inflation tenths (exclusive end), keep the
/// highest-modularity pair and re-cluster at it
pub fn flow_grid_search(
    graph: &Graph,
    expansions: RangeInclusive<u32>,
    inflation_tenths: Range<u32>,
    config: &Config,
) -> Result<(Vec<Cluster>, FlowSearch)> {
    let grid: Vec<(u32, u32)> = iproduct!(expansions, inflation_tenths).collect();
    if grid.is_empty() {
        return Err(AnalysisError::InvalidParameter(
            "flow search grid is empty".to_string(),
        ));
    }

    log::info!("Running flow clustering over {} parameter combinations", grid.len());

    let adjacency = adjacency_matrix(graph);
    let trials: Vec<FlowTrial> = grid
        .par_iter()
        .map(|&(expansion, tenths)| {
            let inflation = tenths as f64 / 10.0;
            let params = FlowParams::from_config(config, expansion, inflation);
            let result = FlowClusterer::new(params).cluster(&adjacency)?;
            Ok(FlowTrial {
                expansion,
                inflation,
                modularity: result.modularity,
                converged: result.converged,
                cluster_count: result.groups.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best = 0;
    for (i, trial) in trials.iter().enumerate().skip(1) {
        if trial.modularity > trials[best].modularity {
            best = i;
        }
    }
    let FlowTrial {
        expansion: best_expansion,
        inflation: best_inflation,
        modularity: best_modularity,
        ..
    } = trials[best];

    let improved = best_modularity > 0.0;
    if !improved {
        log::warn!(
            "No flow configuration improved on zero modularity (best {:.4} at e={}, r={:.1})",
            best_modularity,
            best_expansion,
            best_inflation
        );
    }
    log::info!(
        "Best flow parameters: expansion {}, inflation {:.1}, modularity {:.4}",
        best_expansion,
        best_inflation,
        best_modularity
    );

    let params = FlowParams::from_config(config, best_expansion, best_inflation);
    let result = FlowClusterer::new(params).cluster(&adjacency)?;
    let clusters = clusters_from_groups(graph, result.groups);

    let search = FlowSearch {
        best_expansion,
        best_inflation,
        best_modularity,
        improved,
        trials,
    };

    Ok((clusters, search))
}

/// One cluster count tried by the spectral sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralTrial {
    pub k: usize,
    pub balance: f64,
    pub cluster_count: usize,
}

/// Trace and winner of a spectral sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralSearch {
    pub best_k: usize,
    pub best_balance: f64,
    pub trials: Vec<SpectralTrial>,
}

/// Try every `k`, keep the one whose cluster sizes have the smallest standard deviation
pub fn spectral_grid_search(
    graph: &Graph,
    k_range: RangeInclusive<usize>,
    config: &Config,
) -> Result<(Vec<Cluster>, SpectralSearch)> {
    let requested = k_range.clone().count();
    let ks: Vec<usize> = k_range.take_while(|&k| k <= graph.node_count).collect();
    if ks.is_empty() {
        return Err(AnalysisError::InvalidParameter(format!(
            "spectral search range has no k at or below the node count {}",
            graph.node_count
        )));
    }
    if ks.len() < requested {
        log::warn!(
            "Limiting spectral search to k <= {} (the node count)",
            graph.node_count
        );
    }

    log::info!("Running spectral clustering for {} values of k", ks.len());

    let mut outcomes: Vec<(SpectralTrial, Vec<Cluster>)> = ks
        .par_iter()
        .map(|&k| {
            let clusters = SpectralClusterer::new(k, config.seed, config.grouping).cluster(graph)?;
            let trial = SpectralTrial {
                k,
                balance: balance_score(&clusters),
                cluster_count: clusters.len(),
            };
            log::debug!("k = {}: balance {:.4}", k, trial.balance);
            Ok((trial, clusters))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best = 0;
    for (i, (trial, _)) in outcomes.iter().enumerate().skip(1) {
        if trial.balance < outcomes[best].0.balance {
            best = i;
        }
    }

    let (winner, clusters) = outcomes.swap_remove(best);
    log::info!("Best k: {} (balance {:.4})", winner.k, winner.balance);

    let mut trials: Vec<SpectralTrial> = outcomes.into_iter().map(|(t, _)| t).collect();
    trials.push(winner.clone());
    trials.sort_by_key(|t| t.k);

    let search = SpectralSearch {
        best_k: winner.k,
        best_balance: winner.balance,
        trials,
    };

    Ok((clusters, search))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::grouping::GroupingStrategy;

    fn two_triangles() -> Graph {
        Graph::from_edges(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)])
    }

    #[test]
    fn test_flow_search_first_maximum_wins() {
        let graph = two_triangles();
        let (clusters, search) = flow_grid_search(&graph, 2..=4, 15..26, &Config::default()).unwrap();

        assert_eq!(search.trials.len(), 33);
        assert_eq!(search.trials[0].expansion, 2);
        assert_eq!(search.trials[1].inflation, 1.6);
        assert_eq!(search.best_expansion, 2);
        assert_eq!(search.best_inflation, 1.5);
        assert!(search.improved);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_flow_search_single_point_matches_direct_run() {
        let graph = two_triangles();
        let config = Config::default();
        let (clusters, search) = flow_grid_search(&graph, 3..=3, 20..21, &config).unwrap();

        let (direct, result) = FlowClusterer::new(FlowParams::from_config(&config, 3, 2.0))
            .cluster_graph(&graph)
            .unwrap();
        assert_eq!(clusters, direct);
        assert_eq!(search.best_modularity, result.modularity);
    }

    #[test]
    fn test_flow_search_reports_no_improvement() {
        // A complete graph has no community structure to find
        let graph = Graph::from_edges(&[(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);
        let (clusters, search) = flow_grid_search(&graph, 2..=2, 15..18, &Config::default()).unwrap();
        assert!(!search.improved);
        assert_eq!(search.best_expansion, 2);
        assert_eq!(search.best_inflation, 1.5);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn test_empty_grids_rejected() {
        let graph = two_triangles();
        let config = Config::default();
        assert!(flow_grid_search(&graph, 3..=2, 15..26, &config).is_err());
        assert!(spectral_grid_search(&graph, 3..=2, &config).is_err());
    }

    #[test]
    fn test_spectral_search_prefers_balanced_split() {
        let graph = two_triangles();
        let (clusters, search) = spectral_grid_search(&graph, 2..=3, &Config::default()).unwrap();
        assert_eq!(search.trials.iter().map(|t| t.k).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(search.best_k, 2);
        assert_eq!(search.best_balance, 0.0);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_spectral_search_stops_at_node_count() {
        let graph = two_triangles();
        let (clusters, search) = spectral_grid_search(&graph, 2..=8, &Config::default()).unwrap();
        assert_eq!(
            search.trials.iter().map(|t| t.k).collect::<Vec<_>>(),
            vec![2, 3, 4, 5, 6]
        );
        assert_eq!(search.best_k, 2);
        assert_eq!(clusters.len(), 2);

        assert!(matches!(
            spectral_grid_search(&graph, 7..=8, &Config::default()),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_spectral_search_single_point_matches_direct_run() {
        let graph = two_triangles();
        let config = Config::default();
        let (clusters, _) = spectral_grid_search(&graph, 2..=2, &config).unwrap();
        let direct = SpectralClusterer::new(2, config.seed, GroupingStrategy::KMeans)
            .cluster(&graph)
            .unwrap();
        assert_eq!(clusters, direct);
    }
}
