//! Maximum flow and minimum cut on a small fixed network, then again with
//! random capacities
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::info;
use serde::Serialize;

use graphlab_core::algorithm::graph::{randomize_capacities, MaxFlowSolver, MinCut};
use graphlab_core::{Adjacency, Graph, GraphKind};

use crate::config::LabConfig;
use crate::error::LabError;

#[derive(Debug, Clone, Serialize)]
pub struct FlowRun {
    pub title: String,
    pub flow_value: f64,
    pub min_cut: MinCut<String>,
    pub edge_flows: Vec<(String, String, f64)>,
}

impl fmt::Display for FlowRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cut = &self.min_cut;
        writeln!(f, "### {} ###", self.title)?;
        writeln!(f, "Max flow: {}", self.flow_value)?;
        writeln!(f, "Min cut (capacity): {}", cut.cut_value)?;
        writeln!(f, "Edges crossing the cut: {:?}", cut.cut_edges)?;
        writeln!(f, "Reachable from source: {:?}", cut.reachable)?;
        write!(f, "Not reachable from source: {:?}", cut.non_reachable)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub variant: String,
    pub runs: Vec<FlowRun>,
}

impl fmt::Display for FlowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                writeln!(f, "\n")?;
            }
            write!(f, "{run}")?;
        }
        Ok(())
    }
}

fn solve(
    solver: &MaxFlowSolver,
    graph: &Graph<String>,
    config: &LabConfig,
    title: &str,
) -> Result<FlowRun, LabError> {
    let result = solver.solve(graph, &config.max_flow.source, &config.max_flow.sink)?;
    Ok(FlowRun {
        title: title.to_owned(),
        flow_value: result.flow_value,
        min_cut: result.min_cut,
        edge_flows: result.edge_flows,
    })
}

pub fn run(config: &LabConfig) -> Result<FlowReport, LabError> {
    let settings = &config.max_flow;
    let mut solver = MaxFlowSolver::default();
    config.configure(&mut solver)?;

    let mut graph = Graph::from_weighted_edges(GraphKind::Directed, settings.network.iter().cloned());
    info!("network: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    let original = solve(&solver, &graph, config, "Original network")?;

    let mut rng = config.rng();
    randomize_capacities(&mut graph, &mut rng, settings.capacity_min..=settings.capacity_max)?;
    let randomized = solve(&solver, &graph, config, "Random capacities")?;

    Ok(FlowReport {
        variant: solver.variant().as_str().to_owned(),
        runs: vec![original, randomized],
    })
}
