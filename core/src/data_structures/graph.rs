//! Labelled graph data structure
//!
//! Nodes carry arbitrary hashable labels (`char`, integers, strings) and are
//! mapped to dense `NodeId` indices in insertion order, so algorithms work on
//! plain vectors while reports can speak in the caller's labels.
//!
//! Edges are simple: adding an edge that already exists overwrites its
//! weight. Neighbour lists keep insertion order, which makes every traversal
//! in the crate deterministic for a given construction sequence.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Adjacency, AlgorithmError, NodeId};

/// Bound satisfied by every usable node label
pub trait NodeLabel: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> NodeLabel for T {}

/// Edge weight; capacity for flow networks, length for shortest paths
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EdgeWeight(pub f64);

impl EdgeWeight {
    pub const UNIT: EdgeWeight = EdgeWeight(1.0);

    #[inline]
    pub fn new(weight: f64) -> Self {
        debug_assert!(!weight.is_nan(), "Edge weight cannot be NaN");
        Self(weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphKind {
    Directed,
    Undirected,
}

/// Edge record as yielded by [`Graph::edges`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: EdgeWeight,
}

#[derive(Debug, Clone)]
pub struct Graph<N> {
    kind: GraphKind,
    labels: Vec<N>,
    index: HashMap<N, NodeId>,
    /// Out-neighbours (all neighbours when undirected), insertion order
    adjacency: Vec<Vec<NodeId>>,
    /// Keyed by `(source, target)`; undirected edges by `(min, max)`
    weights: HashMap<(NodeId, NodeId), EdgeWeight>,
}

impl<N: NodeLabel> Graph<N> {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            labels: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            weights: HashMap::new(),
        }
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected)
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    /// Builds a graph from `(u, v)` pairs with unit weights
    pub fn from_edges<I>(kind: GraphKind, edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new(kind);
        for (u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Builds a graph from `(u, v, weight)` triples
    pub fn from_weighted_edges<I>(kind: GraphKind, edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut graph = Self::new(kind);
        for (u, v, w) in edges {
            graph.add_weighted_edge(u, v, EdgeWeight::new(w));
        }
        graph
    }

    #[inline]
    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.kind == GraphKind::Directed
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Inserts a node if missing and returns its identifier
    pub fn add_node(&mut self, label: N) -> NodeId {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = NodeId(self.labels.len());
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        self.adjacency.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, source: N, target: N) -> bool {
        self.add_weighted_edge(source, target, EdgeWeight::UNIT)
    }

    /// Adds an edge, creating missing endpoints
    ///
    /// Returns `false` when the edge already existed; its weight is
    /// overwritten in that case.
    pub fn add_weighted_edge(&mut self, source: N, target: N, weight: EdgeWeight) -> bool {
        let s = self.add_node(source);
        let t = self.add_node(target);
        self.connect(s, t, weight)
    }

    /// Same as [`Graph::add_weighted_edge`] over existing identifiers
    pub fn connect(&mut self, source: NodeId, target: NodeId, weight: EdgeWeight) -> bool {
        let key = self.key(source, target);
        if let Some(existing) = self.weights.get_mut(&key) {
            *existing = weight;
            return false;
        }
        self.weights.insert(key, weight);
        self.adjacency[source.0].push(target);
        if !self.is_directed() && source != target {
            self.adjacency[target.0].push(source);
        }
        true
    }

    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeWeight, AlgorithmError> {
        let key = self.key(source, target);
        let weight = self
            .weights
            .remove(&key)
            .ok_or_else(|| self.edge_not_found(source, target))?;
        self.adjacency[source.0].retain(|&n| n != target);
        if !self.is_directed() {
            self.adjacency[target.0].retain(|&n| n != source);
        }
        Ok(weight)
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.weights.contains_key(&self.key(source, target))
    }

    pub fn edge_weight(&self, source: NodeId, target: NodeId) -> Result<EdgeWeight, AlgorithmError> {
        self.weights
            .get(&self.key(source, target))
            .copied()
            .ok_or_else(|| self.edge_not_found(source, target))
    }

    pub fn set_edge_weight(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: EdgeWeight,
    ) -> Result<(), AlgorithmError> {
        let key = self.key(source, target);
        match self.weights.get_mut(&key) {
            Some(existing) => {
                *existing = weight;
                Ok(())
            }
            None => Err(self.edge_not_found(source, target)),
        }
    }

    pub fn node_id(&self, label: &N) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Resolves a label, failing with `InvalidNode` when absent
    pub fn require(&self, label: &N) -> Result<NodeId, AlgorithmError> {
        self.node_id(label)
            .ok_or_else(|| AlgorithmError::InvalidNode(format!("{label:?}")))
    }

    pub fn label(&self, id: NodeId) -> &N {
        &self.labels[id.0]
    }

    pub fn labels(&self) -> &[N] {
        &self.labels
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(NodeId)
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency[id.0].len()
    }

    /// Edges in node insertion order, each undirected edge once
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().enumerate().flat_map(move |(u, neighbors)| {
            let source = NodeId(u);
            neighbors
                .iter()
                .filter(move |&&target| self.is_directed() || target >= source)
                .map(move |&target| Edge {
                    source,
                    target,
                    weight: self.weights[&self.key(source, target)],
                })
        })
    }

    /// Same as [`Graph::edges`] but as label pairs
    pub fn labelled_edges(&self) -> Vec<(N, N)> {
        self.edges()
            .map(|e| (self.label(e.source).clone(), self.label(e.target).clone()))
            .collect()
    }

    #[inline]
    fn key(&self, source: NodeId, target: NodeId) -> (NodeId, NodeId) {
        if self.is_directed() || source <= target {
            (source, target)
        } else {
            (target, source)
        }
    }

    fn edge_not_found(&self, source: NodeId, target: NodeId) -> AlgorithmError {
        let describe = |id: NodeId| {
            self.labels
                .get(id.0)
                .map(|l| format!("{l:?}"))
                .unwrap_or_else(|| id.to_string())
        };
        AlgorithmError::EdgeNotFound(describe(source), describe(target))
    }
}

impl<N: NodeLabel> Adjacency for Graph<N> {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation_and_basic_operations() {
        let mut graph: Graph<char> = Graph::directed();

        assert!(graph.add_weighted_edge('S', 'A', EdgeWeight::new(14.0)));
        assert!(graph.add_weighted_edge('A', 'T', EdgeWeight::new(3.0)));

        let s = graph.require(&'S').unwrap();
        let a = graph.require(&'A').unwrap();
        let t = graph.require(&'T').unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_weight(s, a).unwrap().0, 14.0);
        assert!(graph.edge_weight(a, s).is_err());
        assert!(graph.edge_weight(s, t).is_err());
    }

    #[test]
    fn test_duplicate_edge_overwrites_weight() {
        let mut graph: Graph<u32> = Graph::undirected();
        assert!(graph.add_weighted_edge(1, 2, EdgeWeight::new(5.0)));
        assert!(!graph.add_weighted_edge(2, 1, EdgeWeight::new(7.0)));

        let (a, b) = (graph.require(&1).unwrap(), graph.require(&2).unwrap());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(b, a).unwrap().0, 7.0);
        assert_eq!(graph.neighbors(a), &[b]);
    }

    #[test]
    fn test_undirected_neighbors_and_edges() {
        let graph = Graph::from_edges(GraphKind::Undirected, [(4, 13), (3, 10), (10, 13)]);

        let labelled = graph.labelled_edges();
        assert_eq!(labelled, vec![(4, 13), (13, 10), (3, 10)]);

        let ten = graph.require(&10).unwrap();
        let neighbors: Vec<_> = graph.neighbors(ten).iter().map(|&n| *graph.label(n)).collect();
        assert_eq!(neighbors, vec![3, 13]);
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = Graph::from_edges(GraphKind::Undirected, [(1, 2), (2, 3)]);
        let (one, two) = (graph.require(&1).unwrap(), graph.require(&2).unwrap());

        assert!(graph.remove_edge(two, one).is_ok());
        assert!(!graph.has_edge(one, two));
        assert!(graph.neighbors(one).is_empty());
        assert_eq!(graph.edge_count(), 1);
        assert!(matches!(
            graph.remove_edge(one, two),
            Err(AlgorithmError::EdgeNotFound(_, _))
        ));
    }

    #[test]
    fn test_unknown_label_is_invalid_node() {
        let graph: Graph<char> = Graph::directed();
        assert!(matches!(graph.require(&'Z'), Err(AlgorithmError::InvalidNode(_))));
    }
}
