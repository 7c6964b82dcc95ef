//! graphlab core
//!
//! Algorithms behind the lab exercises: bipartite matching, bipartite repair,
//! maximum flow / minimum cut, all-pairs shortest paths, random graph
//! generation with planted cliques and multiset arrangement counting.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;

pub use crate::algorithm::traits::{
    Adjacency, Algorithm, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId,
};
pub use crate::data_structures::graph::{EdgeWeight, Graph, GraphKind, NodeLabel};
