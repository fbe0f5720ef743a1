//! CSV edge-list loading

use crate::graph::{Graph, GraphBuilder};
use anyhow::{anyhow, Result};
use polars::prelude::*;
use std::path::Path;

/// Column holding the first endpoint of each edge
pub const SOURCE_COLUMN: &str = "node_1";
/// Column holding the second endpoint of each edge
pub const TARGET_COLUMN: &str = "node_2";

/// Load an undirected graph from a CSV file with integer `node_1`, `node_2` columns
///
/// The node set is every endpoint, in first-appearance order. Rows with a
/// missing endpoint are skipped.
pub fn load_edge_list(path: &str) -> Result<Graph> {
    log::info!("Reading edge list: {}", path);

    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()?
        .select([col(SOURCE_COLUMN), col(TARGET_COLUMN)])
        .collect()?;

    log::info!("Loaded {} edge rows", df.height());

    let sources = df.column(SOURCE_COLUMN)?.cast(&DataType::Int64)?;
    let targets = df.column(TARGET_COLUMN)?.cast(&DataType::Int64)?;

    let mut builder = GraphBuilder::with_capacity(df.height());
    let mut skipped = 0usize;
    for (a, b) in sources.i64()?.into_iter().zip(targets.i64()?.into_iter()) {
        match (a, b) {
            (Some(a), Some(b)) => builder.connect(a, b),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with a missing endpoint", skipped);
    }

    let graph = builder.build();
    log::info!(
        "Built graph with {} nodes and {} edges ({} bytes)",
        graph.node_count,
        graph.edge_count(),
        graph.memory_usage()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_edge_list() {
        let path = std::env::temp_dir().join(format!("edges-{}.csv", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "node_1,node_2").unwrap();
            writeln!(file, "10,20").unwrap();
            writeln!(file, "20,30").unwrap();
            writeln!(file, "30,10").unwrap();
            writeln!(file, "20,10").unwrap();
        }

        let graph = load_edge_list(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(graph.node_ids, vec![10, 20, 30]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_edge_list("/definitely/not/here.csv").is_err());
    }
}
