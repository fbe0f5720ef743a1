//! Greedy modularity agglomeration (Clauset-Newman-Moore)
//!
//! Non-iterative baseline used as a comparison point for the flow and
//! spectral methods. Every node starts in its own community; the connected
//! pair whose merge raises modularity the most is joined until no merge
//! improves it.

use crate::cluster::{clusters_from_groups, Cluster};
use crate::graph::Graph;
use std::collections::BTreeMap;

/// Detect communities by greedy modularity merging
///
/// Ties between candidate merges go to the lexicographically smallest
/// community pair. Communities are returned largest first, equal sizes
/// ordered by their first member's position.
pub fn greedy_modularity_communities(graph: &Graph) -> Vec<Cluster> {
    let n = graph.node_count;
    let m = graph.edge_count() as f64;

    let mut members: Vec<Vec<u32>> = (0..n as u32).map(|node| vec![node]).collect();
    let mut alive = vec![true; n];

    if m > 0.0 {
        // a[c]: fraction of edge ends attached to community c
        let mut a: Vec<f64> = (0..n).map(|node| graph.degree(node) as f64 / (2.0 * m)).collect();

        // Edge counts between distinct communities, keyed (low, high)
        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for src in 0..n {
            for &dst in graph.neighbors(src) {
                let dst = dst as usize;
                if src < dst {
                    *between.entry((src, dst)).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut merges = 0usize;
        loop {
            let mut best: Option<((usize, usize), f64)> = None;
            for (&(i, j), &edges) in &between {
                let gain = edges / m - 2.0 * a[i] * a[j];
                if best.map_or(true, |(_, g)| gain > g) {
                    best = Some(((i, j), gain));
                }
            }

            let ((keep, gone), gain) = match best {
                Some(candidate) if candidate.1 > 0.0 => candidate,
                _ => break,
            };

            let moved = std::mem::take(&mut members[gone]);
            members[keep].extend(moved);
            alive[gone] = false;
            a[keep] += a[gone];
            a[gone] = 0.0;

            // Re-key every pair touching the absorbed community
            let touching: Vec<(usize, usize)> = between
                .keys()
                .filter(|&&(i, j)| i == gone || j == gone)
                .copied()
                .collect();
            for key in touching {
                let Some(edges) = between.remove(&key) else {
                    continue;
                };
                let other = if key.0 == gone { key.1 } else { key.0 };
                if other == keep {
                    continue;
                }
                let rekeyed = (keep.min(other), keep.max(other));
                *between.entry(rekeyed).or_insert(0.0) += edges;
            }

            merges += 1;
            log::debug!("Merged community {} into {} (gain {:.4})", gone, keep, gain);
        }

        log::info!("Greedy modularity performed {} merges", merges);
    }

    let mut groups: Vec<Vec<u32>> = members
        .into_iter()
        .zip(alive)
        .filter(|(_, alive)| *alive)
        .map(|(mut group, _)| {
            group.sort_unstable();
            group
        })
        .collect();
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

    clusters_from_groups(graph, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::is_hard_partition;

    #[test]
    fn test_two_triangles() {
        let g = Graph::from_edges(&[(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)]);
        let clusters = greedy_modularity_communities(&g);
        assert!(is_hard_partition(&g, &clusters));
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![1, 2, 3]);
        assert_eq!(clusters[1].members, vec![4, 5, 6]);
    }

    #[test]
    fn test_edgeless_graph_keeps_singletons() {
        let g = Graph::from_parts(&[3, 1, 2], &[]).unwrap();
        let clusters = greedy_modularity_communities(&g);
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].members, vec![3]);
    }
}
