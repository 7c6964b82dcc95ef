//! Graph storage, disjoint sets and random generators
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod generators;
pub mod graph;
pub mod union_find;

pub use self::graph::{Edge, EdgeWeight, Graph, GraphKind, NodeLabel};
pub use self::union_find::UnionFind;
