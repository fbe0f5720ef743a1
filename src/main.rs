use anyhow::Result;
use clap::{Parser, ValueEnum};
use community_influencers::centrality::CentralityMode;
use community_influencers::cluster::filter::filter_clusters;
use community_influencers::cluster::grouping::GroupingStrategy;
use community_influencers::cluster::metrics::calculate_density;
use community_influencers::{
    data, rank_influencers, run_community_detection_alt, run_flow_clustering,
    run_spectral_clustering, Config,
};
use serde_json::json;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Markov flow clustering, tuned for modularity
    Flow,
    /// Laplacian spectral clustering, tuned for size balance
    Spectral,
    /// Greedy modularity merging
    Greedy,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Degree,
    Closeness,
    Eigenvector,
}

impl From<Mode> for CentralityMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Degree => CentralityMode::Degree,
            Mode::Closeness => CentralityMode::Closeness,
            Mode::Eigenvector => CentralityMode::Eigenvector,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grouping {
    Kmeans,
    Kmedoids,
}

#[derive(Parser, Debug)]
#[clap(
    name = "community-influencers",
    about = "Find the most influential node of every community in a graph"
)]
struct Cli {
    /// Path to a CSV edge list with node_1,node_2 columns
    #[clap(long)]
    input: String,

    /// Community detection method
    #[clap(long, value_enum, default_value = "flow")]
    method: Method,

    /// Centrality used to pick each community's influencer
    #[clap(long, value_enum, default_value = "degree")]
    mode: Mode,

    /// Communities with this many members or fewer are ignored
    #[clap(long, default_value = "4")]
    min_community_size: usize,

    /// Smallest expansion factor tried
    #[clap(long, default_value = "2")]
    expansion_min: u32,

    /// Largest expansion factor tried
    #[clap(long, default_value = "4")]
    expansion_max: u32,

    /// Smallest inflation tried, in tenths
    #[clap(long, default_value = "15")]
    inflation_min: u32,

    /// Inflation upper bound in tenths (exclusive)
    #[clap(long, default_value = "26")]
    inflation_max: u32,

    /// Smallest cluster count tried by spectral clustering
    #[clap(long, default_value = "2")]
    k_min: usize,

    /// Largest cluster count tried by spectral clustering
    #[clap(long, default_value = "8")]
    k_max: usize,

    /// Grouping of spectral embeddings
    #[clap(long, value_enum, default_value = "kmeans")]
    grouping: Grouping,

    /// Seed for every randomized step
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let mut config = Config::new(
        args.expansion_min..=args.expansion_max,
        args.inflation_min..args.inflation_max,
        args.k_min..=args.k_max,
        args.min_community_size,
    );
    config.seed = args.seed;
    config.centrality = args.mode.into();
    config.grouping = match args.grouping {
        Grouping::Kmeans => GroupingStrategy::KMeans,
        Grouping::Kmedoids => GroupingStrategy::KMedoids,
    };

    // 1. Load data
    let mut graph = data::edge_list::load_edge_list(&args.input)?;

    // 2. Detect communities
    let (clusters, search) = match args.method {
        Method::Flow => {
            let (clusters, search) = run_flow_clustering(
                &graph,
                config.expansion_range.clone(),
                config.inflation_tenths.clone(),
                &config,
            )?;
            (clusters, serde_json::to_value(&search)?)
        }
        Method::Spectral => {
            let components = graph.connected_components().len();
            if components > 1 {
                log::warn!(
                    "Graph has {} connected components; clustering the largest one",
                    components
                );
                graph = graph.largest_component();
            }
            let (clusters, search) =
                run_spectral_clustering(&graph, config.k_range.clone(), &config)?;
            (clusters, serde_json::to_value(&search)?)
        }
        Method::Greedy => (run_community_detection_alt(&graph)?, serde_json::Value::Null),
    };

    log::info!("Found {} clusters", clusters.len());

    // 3. Rank influencers
    let influencers = rank_influencers(
        &clusters,
        &graph,
        config.centrality,
        config.min_community_size,
        &config,
    )?;
    let kept = filter_clusters(&clusters, config.min_community_size);

    let communities: Vec<_> = kept
        .iter()
        .zip(&influencers)
        .map(|(cluster, influencer)| {
            json!({
                "id": cluster.id,
                "size": cluster.size(),
                "density": calculate_density(&graph, &cluster.members),
                "influencer": influencer,
            })
        })
        .collect();

    let report = json!({
        "graph": {
            "node_count": graph.node_count,
            "edge_count": graph.edge_count(),
        },
        "cluster_count": clusters.len(),
        "centrality": config.centrality,
        "search": search,
        "communities": communities,
        "influencers": influencers,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);

    log::info!("Analysis complete");

    Ok(())
}
