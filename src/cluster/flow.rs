//! Stochastic flow (Markov) clustering
//!
//! The adjacency matrix gets self-loops and is column-normalized into a
//! stochastic matrix. Each iteration then expands (matrix power), inflates
//! (element-wise power), prunes tiny entries and renormalizes, until two
//! successive matrices agree within the tolerance. Clusters are read off the
//! attractor rows of the converged matrix and scored by modularity over the
//! self-looped adjacency the flow started from.

use crate::cluster::modularity::modularity;
use crate::cluster::{clusters_from_groups, Cluster};
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::graph::components::DisjointSets;
use crate::graph::{adjacency_matrix, Graph};
use ndarray::Array2;
use serde::Serialize;

/// Smallest entry still treated as flow when reading clusters off a matrix
const MIN_FLOW: f64 = 1e-9;

/// Hyperparameters for one flow clustering run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowParams {
    /// Matrix power applied during expansion (>= 2)
    pub expansion: u32,
    /// Element-wise power applied during inflation (> 1 sharpens)
    pub inflation: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Entries below this are zeroed after inflation; 0 disables pruning
    pub pruning_threshold: f64,
    /// Weight written on the diagonal before normalization
    pub loop_weight: f64,
}

impl FlowParams {
    /// Parameters with the default numeric settings
    pub fn new(expansion: u32, inflation: f64) -> Self {
        Self::from_config(&Config::default(), expansion, inflation)
    }

    pub fn from_config(config: &Config, expansion: u32, inflation: f64) -> Self {
        Self {
            expansion,
            inflation,
            tolerance: config.flow_tolerance,
            max_iterations: config.flow_max_iterations,
            pruning_threshold: config.pruning_threshold,
            loop_weight: config.loop_weight,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.expansion < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "expansion must be at least 2, got {}",
                self.expansion
            )));
        }
        if !(self.inflation.is_finite() && self.inflation > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "inflation must be positive, got {}",
                self.inflation
            )));
        }
        if !(self.loop_weight.is_finite() && self.loop_weight > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "loop weight must be positive, got {}",
                self.loop_weight
            )));
        }
        if !(self.pruning_threshold >= 0.0 && self.pruning_threshold < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "pruning threshold must lie in [0, 1), got {}",
                self.pruning_threshold
            )));
        }
        Ok(())
    }
}

/// Reject non-square matrices and negative or non-finite entries
pub fn validate_matrix(matrix: &Array2<f64>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(AnalysisError::InvalidMatrix(format!(
            "expected a square matrix, got {}x{}",
            rows, cols
        )));
    }
    if let Some(((i, j), v)) = matrix
        .indexed_iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(AnalysisError::InvalidMatrix(format!(
            "entry ({}, {}) is {}",
            i, j, v
        )));
    }
    Ok(())
}

/// Scale every column with a positive sum to sum to 1
pub fn normalize_columns(matrix: &mut Array2<f64>) {
    for mut column in matrix.columns_mut() {
        let sum = column.sum();
        if sum > 0.0 {
            column.mapv_inplace(|x| x / sum);
        }
    }
}

/// Raise `matrix` to the `power`-th matrix power
pub fn expand(matrix: &Array2<f64>, power: u32) -> Array2<f64> {
    let mut result = matrix.clone();
    for _ in 1..power {
        result = result.dot(matrix);
    }
    result
}

/// Element-wise power, prune, then renormalize columns
///
/// The largest entry of each column always survives pruning, so every
/// column of a stochastic input still sums to 1 afterwards.
pub fn inflate(matrix: &mut Array2<f64>, power: f64, pruning_threshold: f64) {
    matrix.mapv_inplace(|x| x.powf(power));

    if pruning_threshold > 0.0 {
        for mut column in matrix.columns_mut() {
            let keep = column
                .iter()
                .enumerate()
                .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
                .0;
            for (i, v) in column.iter_mut().enumerate() {
                if i != keep && *v < pruning_threshold {
                    *v = 0.0;
                }
            }
        }
    }

    normalize_columns(matrix);
}

fn max_abs_difference(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Column-stochastic matrix evolving under expansion and inflation
#[derive(Debug, Clone)]
pub struct FlowState {
    matrix: Array2<f64>,
    looped: Array2<f64>,
    params: FlowParams,
    iterations: usize,
}

impl FlowState {
    /// Add self-loops to `adjacency` and normalize it into the initial state
    pub fn new(adjacency: &Array2<f64>, params: &FlowParams) -> Result<Self> {
        validate_matrix(adjacency)?;
        params.validate()?;

        let mut looped = adjacency.clone();
        looped.diag_mut().fill(params.loop_weight);
        let mut matrix = looped.clone();
        normalize_columns(&mut matrix);

        Ok(Self {
            matrix,
            looped,
            params: params.clone(),
            iterations: 0,
        })
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Initial stochastic matrix with its column scaling undone: the
    /// adjacency plus self-loops of weight `loop_weight`
    pub fn looped_adjacency(&self) -> &Array2<f64> {
        &self.looped
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One expansion + inflation round; returns the largest entry change
    pub fn step(&mut self) -> f64 {
        let mut next = expand(&self.matrix, self.params.expansion);
        inflate(&mut next, self.params.inflation, self.params.pruning_threshold);
        let delta = max_abs_difference(&self.matrix, &next);
        self.matrix = next;
        self.iterations += 1;
        delta
    }

    /// Iterate until converged or the iteration cap is hit; returns whether it converged
    pub fn run(&mut self) -> bool {
        while self.iterations < self.params.max_iterations {
            if self.step() < self.params.tolerance {
                return true;
            }
        }
        false
    }

    /// Whether every column sums to 1 within `tolerance`
    pub fn is_column_stochastic(&self, tolerance: f64) -> bool {
        self.matrix
            .columns()
            .into_iter()
            .all(|column| (column.sum() - 1.0).abs() <= tolerance)
    }
}

/// Group nodes by the attractor rows of a converged flow matrix
///
/// Attractors are nodes whose diagonal entry exceeds `cutoff`. Every
/// attractor is merged with each column holding more than `cutoff` in its
/// row, closed transitively; nodes reached by no attractor stay singletons.
/// Groups are ordered by their smallest node position.
pub fn extract_clusters(matrix: &Array2<f64>, cutoff: f64) -> Vec<Vec<u32>> {
    let n = matrix.nrows();
    let cutoff = cutoff.max(MIN_FLOW);
    let mut sets = DisjointSets::new(n);

    for attractor in 0..n {
        if matrix[[attractor, attractor]] <= cutoff {
            continue;
        }
        for (node, &flow) in matrix.row(attractor).iter().enumerate() {
            if flow > cutoff {
                sets.union(attractor as u32, node as u32);
            }
        }
    }

    sets.groups()
}

/// Outcome of one flow clustering run, in node positions
#[derive(Debug, Clone, PartialEq)]
pub struct FlowResult {
    pub groups: Vec<Vec<u32>>,
    pub modularity: f64,
    pub converged: bool,
    pub iterations: usize,
}

/// Flow clustering engine over adjacency matrices
#[derive(Debug, Clone)]
pub struct FlowClusterer {
    pub params: FlowParams,
}

impl FlowClusterer {
    pub fn new(params: FlowParams) -> Self {
        Self { params }
    }

    /// Cluster a square non-negative adjacency matrix
    ///
    /// Running out of iterations is not an error: the last state is used and
    /// `converged` is false.
    pub fn cluster(&self, adjacency: &Array2<f64>) -> Result<FlowResult> {
        let mut state = FlowState::new(adjacency, &self.params)?;
        let converged = state.run();
        if !converged {
            log::warn!(
                "Flow clustering (e={}, r={:.1}) did not converge within {} iterations",
                self.params.expansion,
                self.params.inflation,
                self.params.max_iterations
            );
        }

        let groups = extract_clusters(state.matrix(), self.params.pruning_threshold);
        let modularity = modularity(state.looped_adjacency(), &groups);

        log::debug!(
            "Flow clustering (e={}, r={:.1}): {} clusters, modularity {:.4}, {} iterations",
            self.params.expansion,
            self.params.inflation,
            groups.len(),
            modularity,
            state.iterations()
        );

        Ok(FlowResult {
            groups,
            modularity,
            converged,
            iterations: state.iterations(),
        })
    }

    /// Cluster a graph and report clusters by node identifier
    pub fn cluster_graph(&self, graph: &Graph) -> Result<(Vec<Cluster>, FlowResult)> {
        let result = self.cluster(&adjacency_matrix(graph))?;
        let clusters = clusters_from_groups(graph, result.groups.clone());
        Ok((clusters, result))
    }
}
