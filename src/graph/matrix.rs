//! Matrix views of a graph under its stable node ordering

use crate::graph::Graph;
use nalgebra::DMatrix;
use ndarray::Array2;

/// Dense symmetric 0/1 adjacency matrix with a zero diagonal
pub fn adjacency_matrix(graph: &Graph) -> Array2<f64> {
    let n = graph.node_count;
    let mut matrix = Array2::<f64>::zeros((n, n));
    for src in 0..n {
        for &dst in graph.neighbors(src) {
            matrix[[src, dst as usize]] = 1.0;
        }
    }
    matrix
}

/// Unnormalized graph Laplacian `L = D - A`
pub fn laplacian_matrix(graph: &Graph) -> DMatrix<f64> {
    let n = graph.node_count;
    let mut laplacian = DMatrix::<f64>::zeros(n, n);
    for src in 0..n {
        laplacian[(src, src)] = graph.degree(src) as f64;
        for &dst in graph.neighbors(src) {
            laplacian[(src, dst as usize)] = -1.0;
        }
    }
    laplacian
}
