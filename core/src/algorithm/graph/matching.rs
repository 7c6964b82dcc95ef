//! Maximum bipartite matching
//!
//! Kuhn's augmenting-path algorithm: every left node gets one depth-first
//! search for an augmenting path, either landing on a free neighbour or
//! recursively moving a neighbour's current partner elsewhere. One search per
//! left node is enough for a maximum matching on bipartite graphs.
//!
//! The same matching can also be obtained as a unit-capacity maximum flow
//! (`max_matching_via_flow`), which the lab uses as a cross-check.
//!
//! # Complexity
//! O(V·E) for Kuhn; the flow reduction inherits the chosen flow variant.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::{FlowNetwork, MaxFlowVariant};
use crate::algorithm::traits::{
    Adjacency, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics,
    AlgorithmParameter, AlgorithmProfiler, NodeId, ParameterType,
};
use crate::data_structures::graph::{Graph, NodeLabel};

/// Symmetric node -> partner mapping
///
/// Both directions of every pair are stored, so the number of entries is
/// twice the matching size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    mate: BTreeMap<NodeId, NodeId>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn partner(&self, node: NodeId) -> Option<NodeId> {
        self.mate.get(&node).copied()
    }

    #[inline]
    pub fn is_matched(&self, node: NodeId) -> bool {
        self.mate.contains_key(&node)
    }

    /// Number of matched pairs
    #[inline]
    pub fn size(&self) -> usize {
        self.mate.len() / 2
    }

    /// Records `a <-> b`, overwriting whatever `a` and `b` pointed to
    pub fn pair(&mut self, a: NodeId, b: NodeId) {
        self.mate.insert(a, b);
        self.mate.insert(b, a);
    }

    /// Every directed entry `node -> partner`, ordered by node
    pub fn entries(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.mate.iter().map(|(&a, &b)| (a, b))
    }

    /// Each pair once, smaller identifier first
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.entries().filter(|(a, b)| a < b).collect()
    }

    /// Symmetric and no node matched to itself
    pub fn is_valid(&self) -> bool {
        self.entries()
            .all(|(a, b)| a != b && self.partner(b) == Some(a))
    }

    /// Every matched pair is an edge of `graph`
    pub fn uses_only_edges_of<A: Adjacency>(&self, graph: &A) -> bool {
        self.entries().all(|(a, b)| graph.neighbors(a).contains(&b) || graph.neighbors(b).contains(&a))
    }

    pub fn labelled_entries<N: NodeLabel>(&self, graph: &Graph<N>) -> Vec<(N, N)> {
        self.entries()
            .map(|(a, b)| (graph.label(a).clone(), graph.label(b).clone()))
            .collect()
    }

    pub fn labelled_pairs<N: NodeLabel>(&self, graph: &Graph<N>) -> Vec<(N, N)> {
        self.pairs()
            .into_iter()
            .map(|(a, b)| (graph.label(a).clone(), graph.label(b).clone()))
            .collect()
    }
}

fn try_augment<A: Adjacency>(
    graph: &A,
    node: NodeId,
    visited: &mut [bool],
    matching: &mut Matching,
    profiler: &mut AlgorithmProfiler,
) -> bool {
    for &candidate in graph.neighbors(node) {
        match visited.get_mut(candidate.0) {
            Some(seen) if !*seen => *seen = true,
            _ => continue,
        }
        profiler.record_node_exploration();

        let freed = match matching.partner(candidate) {
            None => true,
            Some(current) => try_augment(graph, current, visited, matching, profiler),
        };
        if freed {
            matching.pair(candidate, node);
            return true;
        }
    }
    false
}

/// Runs one augmenting search per unmatched left node
///
/// Left nodes already present in `matching` are skipped, as are identifiers
/// outside `0..graph.node_count()` (in `left` or in neighbour lists).
/// Returns the number of successful augmentations.
pub fn extend_matching<A: Adjacency>(
    graph: &A,
    left: &[NodeId],
    matching: &mut Matching,
    profiler: &mut AlgorithmProfiler,
) -> usize {
    let mut visited = vec![false; graph.node_count()];
    let mut augmentations = 0;

    for &node in left {
        if node.0 >= graph.node_count() || matching.is_matched(node) {
            continue;
        }
        visited.iter_mut().for_each(|v| *v = false);
        if try_augment(graph, node, &mut visited, matching, profiler) {
            augmentations += 1;
            profiler.record_step();
            trace!("augmenting path from {node} (size now {})", matching.size());
        }
    }
    augmentations
}

/// Maximum matching from scratch with Kuhn's algorithm
pub fn max_matching<A: Adjacency>(graph: &A, left: &[NodeId]) -> Matching {
    let mut matching = Matching::new();
    extend_matching(graph, left, &mut matching, &mut AlgorithmProfiler::new());
    matching
}

/// Maximum matching as unit-capacity max flow
///
/// Network: super-source -> every left node -> its non-left neighbours ->
/// super-sink, all capacities one. Each left node gets one source arc however
/// often it is listed; out-of-range identifiers are ignored.
pub fn max_matching_via_flow<A: Adjacency>(
    graph: &A,
    left: &[NodeId],
    variant: MaxFlowVariant,
) -> Matching {
    let n = graph.node_count();
    let (source, sink) = (n, n + 1);
    let mut network = FlowNetwork::new(n + 2);
    let mut is_left = vec![false; n];
    let mut nodes = Vec::with_capacity(left.len());
    for &node in left {
        // repeated or unknown left nodes would add extra source arcs
        if node.0 < n && !is_left[node.0] {
            is_left[node.0] = true;
            nodes.push(node);
        }
    }

    let mut to_sink = vec![false; n];
    let mut arcs = Vec::new();
    for u in nodes {
        network.add_edge(source, u.0, 1.0);
        for &v in graph.neighbors(u) {
            if v.0 >= n || is_left[v.0] {
                continue;
            }
            arcs.push((network.add_edge(u.0, v.0, 1.0), u, v));
            if !to_sink[v.0] {
                to_sink[v.0] = true;
                network.add_edge(v.0, sink, 1.0);
            }
        }
    }

    let flow = network.max_flow(source, sink, variant, &mut AlgorithmProfiler::new());
    let mut matching = Matching::new();
    for (arc, u, v) in arcs {
        if network.edge(arc).flow > 0.5 {
            matching.pair(u, v);
        }
    }
    debug!("flow reduction matched {} pairs (flow {flow})", matching.size());
    matching
}

/// Order in which left nodes get their augmenting search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftOrder {
    /// As given by the caller
    #[default]
    Given,
    /// Fewest neighbours first
    DegreeAscending,
}

impl LeftOrder {
    pub const NAMES: [&'static str; 2] = ["given", "degree_ascending"];

    pub fn as_str(self) -> &'static str {
        match self {
            LeftOrder::Given => Self::NAMES[0],
            LeftOrder::DegreeAscending => Self::NAMES[1],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingResult {
    pub matching: Matching,
    pub metrics: AlgorithmMetrics,
}

/// Kuhn matcher with a configurable left-node order
#[derive(Debug, Clone, Default)]
pub struct KuhnMatching {
    order: LeftOrder,
}

impl KuhnMatching {
    pub fn new(order: LeftOrder) -> Self {
        Self { order }
    }

    pub fn execute<A: Adjacency>(&self, graph: &A, left: &[NodeId]) -> MatchingResult {
        self.execute_from(graph, left, Matching::new())
    }

    /// Continues from an existing matching state
    pub fn execute_from<A: Adjacency>(
        &self,
        graph: &A,
        left: &[NodeId],
        mut matching: Matching,
    ) -> MatchingResult {
        let mut ordered = left.to_vec();
        if self.order == LeftOrder::DegreeAscending {
            ordered.sort_by_key(|&node| graph.neighbors(node).len());
        }

        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        let augmentations = extend_matching(graph, &ordered, &mut matching, &mut profiler);
        profiler.record_custom("augmentations", augmentations as f64);
        let metrics = profiler.into_metrics();

        debug!(
            "kuhn matching over {} left nodes: size {} ({} nodes explored)",
            left.len(),
            matching.size(),
            metrics.nodes_explored
        );
        MatchingResult { matching, metrics }
    }
}

impl Algorithm for KuhnMatching {
    fn name(&self) -> &'static str {
        "kuhn-matching"
    }

    fn category(&self) -> &'static str {
        "matching"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V·E)", "O(V)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::new(
            "left_order",
            self.order.as_str(),
            ParameterType::Enum(LeftOrder::NAMES.iter().map(|s| s.to_string()).collect()),
        )]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.validate_parameter(name, value)?;
        self.order = match value {
            "degree_ascending" => LeftOrder::DegreeAscending,
            _ => LeftOrder::Given,
        };
        Ok(())
    }
}
