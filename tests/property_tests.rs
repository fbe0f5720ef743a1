use community_influencers::cluster::filter::filter_clusters;
use community_influencers::cluster::flow::{FlowClusterer, FlowParams, FlowState};
use community_influencers::cluster::greedy::greedy_modularity_communities;
use community_influencers::cluster::grouping::GroupingStrategy;
use community_influencers::cluster::is_hard_partition;
use community_influencers::cluster::modularity::modularity;
use community_influencers::cluster::spectral::SpectralClusterer;
use community_influencers::graph::adjacency_matrix;
use community_influencers::{Cluster, Graph, NodeId};
use proptest::prelude::*;

fn random_graph() -> impl Strategy<Value = Graph> {
    prop::collection::vec((0i64..12, 0i64..12), 1..30).prop_map(|edges| Graph::from_edges(&edges))
}

/// A path through every node plus random chords, so the graph is connected
fn connected_graph() -> impl Strategy<Value = Graph> {
    (4i64..10).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..15).prop_map(move |chords| {
            let mut edges: Vec<(NodeId, NodeId)> = (0..n - 1).map(|i| (i, i + 1)).collect();
            edges.extend(chords);
            Graph::from_edges(&edges)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn flow_state_stays_column_stochastic(graph in random_graph(), expansion in 2u32..4, tenths in 12u32..30) {
        let params = FlowParams::new(expansion, tenths as f64 / 10.0);
        let mut state = FlowState::new(&adjacency_matrix(&graph), &params).unwrap();
        prop_assert!(state.is_column_stochastic(1e-9));
        for _ in 0..10 {
            state.step();
            prop_assert!(state.is_column_stochastic(1e-9));
        }
    }

    #[test]
    fn flow_clusters_partition_the_graph(graph in random_graph(), tenths in 15u32..26) {
        let (clusters, result) = FlowClusterer::new(FlowParams::new(2, tenths as f64 / 10.0))
            .cluster_graph(&graph)
            .unwrap();
        prop_assert!(is_hard_partition(&graph, &clusters));
        prop_assert!(result.modularity.is_finite() && result.modularity <= 1.0);
    }

    #[test]
    fn greedy_clusters_partition_the_graph(graph in random_graph()) {
        let clusters = greedy_modularity_communities(&graph);
        prop_assert!(is_hard_partition(&graph, &clusters));
        for pair in clusters.windows(2) {
            prop_assert!(pair[0].size() >= pair[1].size());
        }
    }

    #[test]
    fn spectral_clusters_partition_connected_graphs(graph in connected_graph(), k in 2usize..4, seed in any::<u64>()) {
        for grouping in [GroupingStrategy::KMeans, GroupingStrategy::KMedoids] {
            let clusters = SpectralClusterer::new(k, seed, grouping).cluster(&graph).unwrap();
            prop_assert!(is_hard_partition(&graph, &clusters));
            prop_assert!(clusters.len() <= k);
        }
    }

    #[test]
    fn single_cluster_has_zero_modularity(graph in random_graph()) {
        let everyone: Vec<u32> = (0..graph.node_count as u32).collect();
        let q = modularity(&adjacency_matrix(&graph), &[everyone]);
        prop_assert!(q.abs() < 1e-9);
    }

    #[test]
    fn size_filter_is_idempotent(sizes in prop::collection::vec(0usize..10, 0..12), min_size in 0usize..8) {
        let mut next: NodeId = 0;
        let clusters: Vec<Cluster> = sizes
            .iter()
            .enumerate()
            .map(|(id, &size)| {
                let members = (next..next + size as NodeId).collect();
                next += size as NodeId;
                Cluster::new(id as u32, members)
            })
            .collect();

        let once = filter_clusters(&clusters, min_size);
        prop_assert!(once.iter().all(|c| c.size() > min_size));
        prop_assert_eq!(filter_clusters(&once, min_size), once.clone());
        prop_assert_eq!(
            once.len(),
            sizes.iter().filter(|&&s| s > min_size).count()
        );
    }
}
