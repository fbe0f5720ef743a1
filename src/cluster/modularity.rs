//! Partition quality

use ndarray::Array2;

/// Newman modularity of `groups` (node positions) over a symmetric adjacency matrix
///
/// `Q = 1/2m * sum_c [ sum_{i,j in c} A_ij - (sum_{i in c} k_i)^2 / 2m ]`.
/// Returns 0 for a graph without edges.
pub fn modularity(adjacency: &Array2<f64>, groups: &[Vec<u32>]) -> f64 {
    let degrees: Vec<f64> = adjacency.rows().into_iter().map(|row| row.sum()).collect();
    let two_m: f64 = degrees.iter().sum();
    if two_m <= 0.0 {
        return 0.0;
    }

    let mut q = 0.0;
    for group in groups {
        let mut internal = 0.0;
        let mut degree_sum = 0.0;
        for &i in group {
            let i = i as usize;
            degree_sum += degrees[i];
            for &j in group {
                internal += adjacency[[i, j as usize]];
            }
        }
        q += internal - degree_sum * degree_sum / two_m;
    }

    q / two_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{adjacency_matrix, Graph};

    #[test]
    fn test_single_cluster_scores_zero() {
        let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)]);
        let all = vec![(0..g.node_count as u32).collect::<Vec<_>>()];
        assert!(modularity(&adjacency_matrix(&g), &all).abs() < 1e-12);
    }

    #[test]
    fn test_two_triangles() {
        let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)]);
        let q = modularity(&adjacency_matrix(&g), &[vec![0, 1, 2], vec![3, 4, 5]]);
        assert!((q - 5.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_singletons_are_negative() {
        let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 1)]);
        let q = modularity(&adjacency_matrix(&g), &[vec![0], vec![1], vec![2]]);
        assert!(q < 0.0);
    }

    #[test]
    fn test_edgeless_graph() {
        let a = Array2::<f64>::zeros((3, 3));
        assert_eq!(modularity(&a, &[vec![0, 1, 2]]), 0.0);
    }
}
