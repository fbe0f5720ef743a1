//! Spectral clustering on the unnormalized graph Laplacian
//!
//! Nodes are embedded using the eigenvectors of `L = D - A` belonging to
//! the 2nd..k-th smallest eigenvalues, then grouped in that space.

use crate::cluster::grouping::{Grouping, GroupingStrategy};
use crate::cluster::{clusters_from_labels, Cluster};
use crate::error::{AnalysisError, Result};
use crate::graph::{laplacian_matrix, Graph, NodeId};
use nalgebra::{DMatrix, SymmetricEigen};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Spectral clustering for a fixed cluster count
#[derive(Debug, Clone)]
pub struct SpectralClusterer {
    /// Target number of clusters (>= 2)
    pub k: usize,
    pub seed: u64,
    pub grouping: GroupingStrategy,
}

impl SpectralClusterer {
    pub fn new(k: usize, seed: u64, grouping: GroupingStrategy) -> Self {
        Self { k, seed, grouping }
    }

    fn validate(&self, graph: &Graph) -> Result<()> {
        if self.k < 2 {
            return Err(AnalysisError::InvalidParameter(format!(
                "spectral clustering needs k >= 2, got {}",
                self.k
            )));
        }
        if self.k > graph.node_count {
            return Err(AnalysisError::InvalidParameter(format!(
                "k = {} exceeds the node count {}",
                self.k, graph.node_count
            )));
        }
        let components = graph.connected_components().len();
        if components > 1 {
            return Err(AnalysisError::DegenerateEmbedding { components });
        }
        Ok(())
    }

    /// Low-dimensional embedding: one row per node, `k - 1` columns
    ///
    /// Eigenpairs are sorted ascending by eigenvalue (stable on ties) and each
    /// eigenvector's sign is fixed so its largest-magnitude entry is positive.
    pub fn embed(&self, graph: &Graph) -> Result<DMatrix<f64>> {
        self.validate(graph)?;

        let eigen = SymmetricEigen::new(laplacian_matrix(graph));
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let n = graph.node_count;
        let dims = self.k - 1;
        let mut embedding = DMatrix::<f64>::zeros(n, dims);

        // Skip the constant eigenvector of eigenvalue 0
        for (d, &col) in order.iter().skip(1).take(dims).enumerate() {
            let vector = eigen.eigenvectors.column(col);
            let pivot = vector
                .iter()
                .fold(0.0f64, |best, &v| if v.abs() > best.abs() { v } else { best });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            for i in 0..n {
                embedding[(i, d)] = sign * vector[i];
            }
        }

        Ok(embedding)
    }

    /// Cluster label for every node position
    pub fn labels(&self, graph: &Graph) -> Result<Vec<usize>> {
        let embedding = self.embed(graph)?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        Ok(self.grouping.group(&embedding, self.k, &mut rng))
    }

    /// Mapping from node identifier to cluster index, in graph order
    pub fn assign(&self, graph: &Graph) -> Result<Vec<(NodeId, usize)>> {
        let labels = self.labels(graph)?;
        Ok(graph.node_ids.iter().copied().zip(labels).collect())
    }

    /// Explicit membership lists, ordered by cluster index
    pub fn cluster(&self, graph: &Graph) -> Result<Vec<Cluster>> {
        let labels = self.labels(graph)?;
        Ok(clusters_from_labels(graph, &labels))
    }
}
