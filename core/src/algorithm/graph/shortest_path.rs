//! All-pairs shortest paths with Floyd-Warshall
//!
//! Dense O(V³) relaxation over a row-major distance matrix. For each pivot
//! `k` the row `k` is copied first; no entry of row `k` can improve during
//! its own round when the diagonal is zero, so the remaining rows can relax
//! in parallel against the copy.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::algorithm::traits::{
    Adjacency, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics,
    AlgorithmParameter, AlgorithmProfiler, ParameterType,
};
use crate::data_structures::graph::{Graph, NodeLabel};

/// Dense `n x n` distance matrix in node insertion order
///
/// Serialize-only: JSON writes unreachable (`inf`) entries as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Zero diagonal, infinity everywhere else
    pub fn unconnected(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.size + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Leading `min(k, n)` square block
    pub fn top_left(&self, k: usize) -> DistanceMatrix {
        let size = k.min(self.size);
        let data = (0..size)
            .flat_map(|i| self.row(i)[..size].iter().copied())
            .collect();
        DistanceMatrix { size, data }
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Largest finite distance, `None` for an empty matrix
    pub fn diameter(&self) -> Option<f64> {
        self.data
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(None, |acc, d| Some(acc.map_or(d, |m: f64| m.max(d))))
    }

    pub fn unreachable_pairs(&self) -> usize {
        self.data.iter().filter(|d| d.is_infinite()).count()
    }

    fn has_negative_cycle(&self) -> bool {
        (0..self.size).any(|i| self.get(i, i) < 0.0)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}

fn format_cell(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "inf".into() } else { "-inf".into() }
    } else if value.fract() == 0.0 {
        format!("{value:.0}.")
    } else {
        format!("{value}")
    }
}

/// numpy-style block: right-aligned cells, `inf` for unreachable
impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == 0 {
            return write!(f, "[]");
        }
        let cells: Vec<String> = self.data.iter().map(|&v| format_cell(v)).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);

        for i in 0..self.size {
            let prefix = if i == 0 { "[[" } else { " [" };
            let row = cells[i * self.size..(i + 1) * self.size]
                .iter()
                .map(|c| format!("{c:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            let suffix = if i + 1 == self.size { "]]" } else { "]\n" };
            write!(f, "{prefix}{row}{suffix}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortestPathResult {
    pub distances: DistanceMatrix,
    pub metrics: AlgorithmMetrics,
}

/// Floyd-Warshall all-pairs shortest paths
#[derive(Debug, Clone)]
pub struct FloydWarshall {
    parallel: bool,
}

impl Default for FloydWarshall {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl FloydWarshall {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Distances between every ordered pair of nodes
    ///
    /// Fails with `ExecutionError` when a negative cycle makes distances
    /// undefined.
    pub fn execute<N: NodeLabel>(&self, graph: &Graph<N>) -> Result<ShortestPathResult, AlgorithmError> {
        let n = graph.node_count();
        let mut distances = DistanceMatrix::unconnected(n);
        for edge in graph.edges() {
            let (i, j, w) = (edge.source.0, edge.target.0, edge.weight.0);
            if w < distances.get(i, j) {
                distances.set(i, j, w);
            }
            if !graph.is_directed() && w < distances.get(j, i) {
                distances.set(j, i, w);
            }
        }

        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        for k in 0..n {
            let pivot_row = distances.row(k).to_vec();
            let relax = |row: &mut [f64]| {
                let through_pivot = row[k];
                if through_pivot.is_infinite() {
                    return;
                }
                for (d, &tail) in row.iter_mut().zip(&pivot_row) {
                    let candidate = through_pivot + tail;
                    if candidate < *d {
                        *d = candidate;
                    }
                }
            };
            if self.parallel {
                distances.data.par_chunks_mut(n).for_each(relax);
            } else {
                distances.data.chunks_mut(n).for_each(relax);
            }
            profiler.record_step();
        }
        profiler.record_custom("relaxations", (n * n * n) as f64);
        let metrics = profiler.into_metrics();

        if distances.has_negative_cycle() {
            return Err(AlgorithmError::ExecutionError(
                "negative cycle: shortest paths are undefined".into(),
            ));
        }

        debug!(
            "floyd-warshall n={n} parallel={} finished in {:?}",
            self.parallel, metrics.execution_time
        );
        if distances.unreachable_pairs() > 0 {
            info!("{} ordered pairs are unreachable", distances.unreachable_pairs());
        }
        Ok(ShortestPathResult { distances, metrics })
    }
}

impl Algorithm for FloydWarshall {
    fn name(&self) -> &'static str {
        "floyd-warshall"
    }

    fn category(&self) -> &'static str {
        "shortest-path"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V³)", "O(V²)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::new(
            "parallel",
            &self.parallel.to_string(),
            ParameterType::Boolean,
        )]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.validate_parameter(name, value)?;
        self.parallel = value == "true";
        Ok(())
    }
}
