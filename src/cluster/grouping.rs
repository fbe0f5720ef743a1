//! Grouping strategies for embedded points

use nalgebra::DMatrix;
use rand::{Rng, RngCore};
use serde::Serialize;

/// Partition the rows of `points` into at most `k` labelled groups
pub trait Grouping {
    fn group(&self, points: &DMatrix<f64>, k: usize, rng: &mut dyn RngCore) -> Vec<usize>;
}

/// Selectable grouping strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupingStrategy {
    /// Centroid-based (Lloyd's k-means)
    KMeans,
    /// Medoid-based (alternating k-medoids)
    KMedoids,
}

impl Grouping for GroupingStrategy {
    fn group(&self, points: &DMatrix<f64>, k: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        match self {
            GroupingStrategy::KMeans => KMeans::default().group(points, k, rng),
            GroupingStrategy::KMedoids => KMedoids::default().group(points, k, rng),
        }
    }
}

fn squared_distance(points: &DMatrix<f64>, i: usize, center: &[f64]) -> f64 {
    center
        .iter()
        .enumerate()
        .map(|(d, c)| {
            let diff = points[(i, d)] - c;
            diff * diff
        })
        .sum()
}

fn point(points: &DMatrix<f64>, i: usize) -> Vec<f64> {
    (0..points.ncols()).map(|d| points[(i, d)]).collect()
}

/// Index of the nearest center; ties go to the lowest index
fn nearest(points: &DMatrix<f64>, i: usize, centers: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (c, center) in centers.iter().enumerate() {
        let distance = squared_distance(points, i, center);
        if distance < best_distance {
            best_distance = distance;
            best = c;
        }
    }
    best
}

/// k-means++ seeding: pick rows with probability proportional to squared distance
fn plus_plus_seeds(points: &DMatrix<f64>, k: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let n = points.nrows();
    let mut seeds = vec![rng.gen_range(0..n)];

    while seeds.len() < k {
        let centers: Vec<Vec<f64>> = seeds.iter().map(|&s| point(points, s)).collect();
        let distances: Vec<f64> = (0..n)
            .map(|i| {
                centers
                    .iter()
                    .map(|c| squared_distance(points, i, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        let next = if total <= f64::EPSILON {
            // Every row coincides with a seed; take the first unused row
            (0..n).find(|i| !seeds.contains(i)).unwrap_or(0)
        } else {
            let threshold = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut selected = distances.iter().rposition(|&d| d > 0.0).unwrap_or(n - 1);
            for (i, &d) in distances.iter().enumerate() {
                cumulative += d;
                if d > 0.0 && cumulative >= threshold {
                    selected = i;
                    break;
                }
            }
            selected
        };
        seeds.push(next);
    }

    seeds
}

/// Lloyd's algorithm with k-means++ initialization
#[derive(Debug, Clone)]
pub struct KMeans {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl Grouping for KMeans {
    fn group(&self, points: &DMatrix<f64>, k: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let (n, dims) = points.shape();
        if n == 0 {
            return Vec::new();
        }
        let k = k.clamp(1, n);

        let mut centroids: Vec<Vec<f64>> = plus_plus_seeds(points, k, rng)
            .into_iter()
            .map(|s| point(points, s))
            .collect();
        let mut assignments = vec![usize::MAX; n];

        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (i, slot) in assignments.iter_mut().enumerate() {
                let cluster = nearest(points, i, &centroids);
                if *slot != cluster {
                    *slot = cluster;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut counts = vec![0usize; k];
            let mut sums = vec![vec![0.0; dims]; k];
            for (i, &cluster) in assignments.iter().enumerate() {
                counts[cluster] += 1;
                for (d, sum) in sums[cluster].iter_mut().enumerate() {
                    *sum += points[(i, d)];
                }
            }

            let mut max_change: f64 = 0.0;
            for c in 0..k {
                // Empty clusters keep their previous centroid
                if counts[c] == 0 {
                    continue;
                }
                for d in 0..dims {
                    let updated = sums[c][d] / counts[c] as f64;
                    max_change = max_change.max((updated - centroids[c][d]).abs());
                    centroids[c][d] = updated;
                }
            }
            if max_change < self.tolerance {
                break;
            }
        }

        assignments
    }
}

/// Alternating k-medoids: assign to nearest medoid, then move each medoid
/// to the member with the smallest total distance to its group
#[derive(Debug, Clone)]
pub struct KMedoids {
    pub max_iterations: usize,
}

impl Default for KMedoids {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

impl Grouping for KMedoids {
    fn group(&self, points: &DMatrix<f64>, k: usize, rng: &mut dyn RngCore) -> Vec<usize> {
        let n = points.nrows();
        if n == 0 {
            return Vec::new();
        }
        let k = k.clamp(1, n);

        let mut medoids = plus_plus_seeds(points, k, rng);
        let mut assignments = vec![0usize; n];

        for _ in 0..self.max_iterations {
            let centers: Vec<Vec<f64>> = medoids.iter().map(|&m| point(points, m)).collect();
            for (i, slot) in assignments.iter_mut().enumerate() {
                *slot = nearest(points, i, &centers);
            }

            let mut updated = medoids.clone();
            for (c, medoid) in updated.iter_mut().enumerate() {
                let group: Vec<usize> = (0..n).filter(|&i| assignments[i] == c).collect();
                let mut best_cost = f64::INFINITY;
                for &candidate in &group {
                    let center = point(points, candidate);
                    let cost: f64 = group
                        .iter()
                        .map(|&i| squared_distance(points, i, &center).sqrt())
                        .sum();
                    if cost < best_cost {
                        best_cost = cost;
                        *medoid = candidate;
                    }
                }
            }

            if updated == medoids {
                break;
            }
            medoids = updated;
        }

        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn blobs() -> DMatrix<f64> {
        DMatrix::from_row_slice(6, 1, &[-1.0, -1.1, -0.9, 1.0, 1.1, 0.9])
    }

    fn same_split(labels: &[usize]) {
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_kmeans_separates_blobs() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        same_split(&KMeans::default().group(&blobs(), 2, &mut rng));
    }

    #[test]
    fn test_kmedoids_separates_blobs() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        same_split(&KMedoids::default().group(&blobs(), 2, &mut rng));
    }

    #[test]
    fn test_identical_points_still_seed_k_centers() {
        let points = DMatrix::from_element(4, 2, 0.5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let seeds = plus_plus_seeds(&points, 3, &mut rng);
        assert_eq!(seeds.len(), 3);
    }

    #[test]
    fn test_same_seed_same_labels() {
        let run = |seed| {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            GroupingStrategy::KMeans.group(&blobs(), 3, &mut rng)
        };
        assert_eq!(run(11), run(11));
    }
}
