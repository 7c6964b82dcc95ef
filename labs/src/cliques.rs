//! Random sparse graphs with planted cliques, then all-pairs shortest paths
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::{info, warn};
use serde::Serialize;

use graphlab_core::algorithm::graph::{DistanceMatrix, FloydWarshall};
use graphlab_core::data_structures::generators::{graph_with_planted_cliques, PlantedCliques};

use crate::config::LabConfig;
use crate::error::LabError;

#[derive(Debug, Clone, Serialize)]
pub struct GraphDistances {
    pub nodes: usize,
    pub edges: usize,
    pub planted: PlantedCliques,
    /// Every planted clique edge came out at distance one
    pub planted_at_unit_distance: bool,
    pub diameter: Option<f64>,
    pub unreachable_pairs: usize,
    pub preview: DistanceMatrix,
}

#[derive(Debug, Clone, Serialize)]
pub struct CliquesReport {
    pub graphs: Vec<GraphDistances>,
}

impl fmt::Display for CliquesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, graph) in self.graphs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Distance matrix for graph with {} nodes computed.", graph.nodes)?;
            write!(f, "{}", graph.preview)?;
        }
        Ok(())
    }
}

fn planted_at_unit_distance(distances: &DistanceMatrix, planted: &PlantedCliques) -> bool {
    let clique = &planted.clique;
    let clique_ok = clique
        .iter()
        .enumerate()
        .all(|(i, &u)| clique[i + 1..].iter().all(|&v| distances.get(u, v) == 1.0));
    let bipartite_ok = planted.bipartite.as_ref().map_or(true, |(left, right)| {
        left.iter().all(|&u| right.iter().all(|&v| distances.get(u, v) == 1.0))
    });
    clique_ok && bipartite_ok
}

pub fn run(config: &LabConfig) -> Result<CliquesReport, LabError> {
    let mut rng = config.rng();
    let mut floyd_warshall = FloydWarshall::default();
    config.configure(&mut floyd_warshall)?;

    let mut graphs = Vec::with_capacity(config.cliques.sizes.len());
    for &n in &config.cliques.sizes {
        let (graph, planted) = graph_with_planted_cliques(n, &mut rng)?;
        info!("graph n={n}: {} edges, K6 on {:?}", graph.edge_count(), planted.clique);

        // nodes are labelled 0..n in insertion order, so labels index the matrix
        let distances = floyd_warshall.execute(&graph)?.distances;
        let unit = planted_at_unit_distance(&distances, &planted);
        if !unit {
            warn!("graph n={n}: planted structure not at distance 1");
        }

        graphs.push(GraphDistances {
            nodes: n,
            edges: graph.edge_count(),
            planted_at_unit_distance: unit,
            diameter: distances.diameter(),
            unreachable_pairs: distances.unreachable_pairs(),
            preview: distances.top_left(config.cliques.preview),
            planted,
        });
    }
    Ok(CliquesReport { graphs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliquesConfig;

    fn seeded(sizes: Vec<usize>) -> LabConfig {
        LabConfig {
            seed: Some(7),
            cliques: CliquesConfig { sizes, preview: 5 },
            ..LabConfig::default()
        }
    }

    #[test]
    fn test_planted_structures_and_connectivity() {
        let report = run(&seeded(vec![6, 15, 33])).unwrap();
        assert_eq!(report.graphs.len(), 3);
        for graph in &report.graphs {
            assert!(graph.planted_at_unit_distance);
            assert_eq!(graph.unreachable_pairs, 0);
            assert_eq!(graph.preview.size(), 5);
        }
        assert!(report.graphs[0].planted.bipartite.is_none());
        assert!(report.graphs[2].planted.bipartite.is_some());
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run(&seeded(vec![20])).unwrap();
        let b = run(&seeded(vec![20])).unwrap();
        assert_eq!(a.graphs[0].preview, b.graphs[0].preview);
        assert_eq!(a.graphs[0].planted, b.graphs[0].planted);
    }

    #[test]
    fn test_too_small_graph_fails() {
        assert!(matches!(run(&seeded(vec![5])), Err(LabError::Algorithm(_))));
    }

    #[test]
    fn test_text_output_headline() {
        let text = run(&seeded(vec![15])).unwrap().to_string();
        assert!(text.starts_with("Distance matrix for graph with 15 nodes computed.\n[["));
    }
}
