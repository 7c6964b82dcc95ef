//! Maximum flow and minimum cut
//!
//! Residual-network implementation with three interchangeable solvers:
//! Edmonds-Karp (BFS augmenting paths), Ford-Fulkerson (DFS augmenting
//! paths) and FIFO push-relabel. The minimum cut is read off the final
//! residual network as the set of nodes still reachable from the source.
//!
//! # Residual convention
//! Every arc is stored next to its reverse arc. A forward arc has the user
//! capacity, its reverse arc capacity zero; pushing `d` units adds `d` to the
//! arc's flow and subtracts `d` from the reverse arc's flow, so the residual
//! capacity of any arc is always `capacity - flow`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmParameter,
    AlgorithmProfiler, NodeId, ParameterType,
};
use crate::data_structures::graph::{EdgeWeight, Graph, NodeLabel};

/// Flow capacity type
pub type Capacity = f64;

/// Flow value type
pub type Flow = f64;

/// Distance label type for push-relabel
pub type DistanceLabel = usize;

/// Residual capacities at or below this are treated as saturated
pub const FLOW_EPSILON: f64 = 1e-9;

/// Maximum flow algorithm variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFlowVariant {
    /// Shortest augmenting paths found by BFS
    #[default]
    EdmondsKarp,
    /// Augmenting paths found by DFS
    FordFulkerson,
    /// Goldberg-Tarjan push-relabel with FIFO vertex selection
    PushRelabelFifo,
}

impl MaxFlowVariant {
    pub const NAMES: [&'static str; 3] = ["edmonds_karp", "ford_fulkerson", "push_relabel_fifo"];

    pub fn as_str(self) -> &'static str {
        match self {
            MaxFlowVariant::EdmondsKarp => Self::NAMES[0],
            MaxFlowVariant::FordFulkerson => Self::NAMES[1],
            MaxFlowVariant::PushRelabelFifo => Self::NAMES[2],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "edmonds_karp" => Some(MaxFlowVariant::EdmondsKarp),
            "ford_fulkerson" => Some(MaxFlowVariant::FordFulkerson),
            "push_relabel_fifo" => Some(MaxFlowVariant::PushRelabelFifo),
            _ => None,
        }
    }
}

/// Flow edge representation with residual capacity tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub capacity: Capacity,
    pub flow: Flow,
    /// Index of the paired arc in the opposite direction
    pub reverse: usize,
}

impl FlowEdge {
    #[inline]
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity - self.flow
    }
}

/// Flow network with paired residual arcs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            edges: Vec::new(),
        }
    }

    /// Builds the network of a weighted graph
    ///
    /// Returns the network and, for every edge of `graph.edges()` in order,
    /// the index of its forward arc. Undirected edges become two arcs of the
    /// same capacity; the index points at the `source -> target` one.
    pub fn from_graph<N: NodeLabel>(graph: &Graph<N>) -> Result<(Self, Vec<usize>), AlgorithmError> {
        use crate::algorithm::traits::Adjacency;

        let mut network = Self::new(graph.node_count());
        let mut arcs = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let capacity = edge.weight.0;
            if capacity < 0.0 || !capacity.is_finite() {
                return Err(AlgorithmError::InvalidGraph(format!(
                    "capacity of {:?} -> {:?} must be finite and non-negative, got {capacity}",
                    graph.label(edge.source),
                    graph.label(edge.target)
                )));
            }
            arcs.push(network.add_edge(edge.source.0, edge.target.0, capacity));
            if !graph.is_directed() && edge.source != edge.target {
                network.add_edge(edge.target.0, edge.source.0, capacity);
            }
        }
        Ok((network, arcs))
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adds a forward arc and its zero-capacity reverse, returning the forward index
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: Capacity) -> usize {
        let forward = self.edges.len();
        let reverse = forward + 1;
        self.edges.push(FlowEdge {
            from,
            to,
            capacity,
            flow: 0.0,
            reverse,
        });
        self.edges.push(FlowEdge {
            from: to,
            to: from,
            capacity: 0.0,
            flow: 0.0,
            reverse: forward,
        });
        self.adjacency[from].push(forward);
        self.adjacency[to].push(reverse);
        forward
    }

    pub fn edge(&self, index: usize) -> &FlowEdge {
        &self.edges[index]
    }

    #[inline]
    fn push_along(&mut self, index: usize, amount: Flow) {
        self.edges[index].flow += amount;
        let reverse = self.edges[index].reverse;
        self.edges[reverse].flow -= amount;
    }

    /// Arc indices of one `source -> sink` path with spare capacity
    ///
    /// `breadth_first` selects BFS (shortest path) over DFS order.
    fn find_augmenting_path(
        &self,
        source: usize,
        sink: usize,
        breadth_first: bool,
        profiler: &mut AlgorithmProfiler,
    ) -> Option<Vec<usize>> {
        let mut parent_edge: Vec<Option<usize>> = vec![None; self.vertex_count()];
        let mut seen = vec![false; self.vertex_count()];
        let mut frontier = VecDeque::from([source]);
        seen[source] = true;

        loop {
            let next = if breadth_first {
                frontier.pop_front()
            } else {
                frontier.pop_back()
            };
            let Some(u) = next else {
                break;
            };
            profiler.record_node_exploration();
            if u == sink {
                break;
            }
            for &index in &self.adjacency[u] {
                let edge = &self.edges[index];
                if !seen[edge.to] && edge.residual_capacity() > FLOW_EPSILON {
                    seen[edge.to] = true;
                    parent_edge[edge.to] = Some(index);
                    frontier.push_back(edge.to);
                }
            }
        }

        if !seen[sink] {
            return None;
        }
        let mut path = Vec::new();
        let mut v = sink;
        while let Some(index) = parent_edge[v] {
            path.push(index);
            v = self.edges[index].from;
        }
        path.reverse();
        Some(path)
    }

    fn augmenting_paths(
        &mut self,
        source: usize,
        sink: usize,
        breadth_first: bool,
        profiler: &mut AlgorithmProfiler,
    ) -> Flow {
        let mut total = 0.0;
        while let Some(path) = self.find_augmenting_path(source, sink, breadth_first, profiler) {
            let bottleneck = path
                .iter()
                .map(|&i| self.edges[i].residual_capacity())
                .fold(Flow::INFINITY, Flow::min);
            for &index in &path {
                self.push_along(index, bottleneck);
            }
            trace!("augmented {bottleneck} along {} arcs", path.len());
            total += bottleneck;
            profiler.record_step();
        }
        total
    }

    fn push_relabel(&mut self, source: usize, sink: usize, profiler: &mut AlgorithmProfiler) -> Flow {
        let n = self.vertex_count();
        let mut labels: Vec<DistanceLabel> = vec![0; n];
        let mut excess: Vec<Flow> = vec![0.0; n];
        let mut current_arc = vec![0usize; n];
        let mut active = VecDeque::new();
        let mut relabels = 0usize;
        labels[source] = n;

        for index in self.adjacency[source].clone() {
            let amount = self.edges[index].residual_capacity();
            if amount > FLOW_EPSILON {
                let to = self.edges[index].to;
                self.push_along(index, amount);
                excess[to] += amount;
                excess[source] -= amount;
                if to != sink && to != source && excess[to] == amount {
                    active.push_back(to);
                }
            }
        }

        while let Some(v) = active.pop_front() {
            profiler.record_node_exploration();
            while excess[v] > FLOW_EPSILON {
                if current_arc[v] == self.adjacency[v].len() {
                    let lowest = self.adjacency[v]
                        .iter()
                        .map(|&i| &self.edges[i])
                        .filter(|e| e.residual_capacity() > FLOW_EPSILON)
                        .map(|e| labels[e.to])
                        .min();
                    match lowest {
                        Some(label) => labels[v] = label + 1,
                        None => break,
                    }
                    current_arc[v] = 0;
                    relabels += 1;
                    continue;
                }

                let index = self.adjacency[v][current_arc[v]];
                let (to, residual) = {
                    let edge = &self.edges[index];
                    (edge.to, edge.residual_capacity())
                };
                if residual > FLOW_EPSILON && labels[v] == labels[to] + 1 {
                    let amount = excess[v].min(residual);
                    let was_inactive = excess[to] <= FLOW_EPSILON;
                    self.push_along(index, amount);
                    excess[v] -= amount;
                    excess[to] += amount;
                    profiler.record_step();
                    if was_inactive && to != source && to != sink {
                        active.push_back(to);
                    }
                } else {
                    current_arc[v] += 1;
                }
            }
        }

        profiler.record_custom("relabels", relabels as f64);
        excess[sink]
    }

    /// Marks vertices reachable from `source` through arcs with spare capacity
    pub fn residual_reachable(&self, source: usize) -> Vec<bool> {
        let mut reachable = vec![false; self.vertex_count()];
        let mut stack = vec![source];
        reachable[source] = true;
        while let Some(u) = stack.pop() {
            for &index in &self.adjacency[u] {
                let edge = &self.edges[index];
                if !reachable[edge.to] && edge.residual_capacity() > FLOW_EPSILON {
                    reachable[edge.to] = true;
                    stack.push(edge.to);
                }
            }
        }
        reachable
    }

    /// Runs the chosen solver from the zero flow and returns the flow value
    pub fn max_flow(
        &mut self,
        source: usize,
        sink: usize,
        variant: MaxFlowVariant,
        profiler: &mut AlgorithmProfiler,
    ) -> Flow {
        for edge in &mut self.edges {
            edge.flow = 0.0;
        }
        match variant {
            MaxFlowVariant::EdmondsKarp => self.augmenting_paths(source, sink, true, profiler),
            MaxFlowVariant::FordFulkerson => self.augmenting_paths(source, sink, false, profiler),
            MaxFlowVariant::PushRelabelFifo => self.push_relabel(source, sink, profiler),
        }
    }
}

/// Source/sink partition read from the final residual network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinCut<N> {
    pub cut_value: Capacity,
    pub reachable: Vec<N>,
    pub non_reachable: Vec<N>,
    pub cut_edges: Vec<(N, N)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult<N> {
    pub flow_value: Flow,
    /// Flow on every graph edge, in graph edge order
    pub edge_flows: Vec<(N, N, Flow)>,
    pub min_cut: MinCut<N>,
    pub metrics: AlgorithmMetrics,
}

/// Maximum flow solver over labelled graphs
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    variant: MaxFlowVariant,
}

impl MaxFlowSolver {
    pub fn new(variant: MaxFlowVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> MaxFlowVariant {
        self.variant
    }

    /// Maximum flow plus the minimum cut it certifies
    pub fn solve<N: NodeLabel>(
        &self,
        graph: &Graph<N>,
        source: &N,
        sink: &N,
    ) -> Result<MaxFlowResult<N>, AlgorithmError> {
        let s = graph.require(source)?;
        let t = graph.require(sink)?;
        if s == t {
            return Err(AlgorithmError::InvalidParameter {
                name: "sink".into(),
                reason: format!("source and sink are both {source:?}"),
            });
        }

        let (mut network, arcs) = FlowNetwork::from_graph(graph)?;
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        let flow_value = network.max_flow(s.0, t.0, self.variant, &mut profiler);
        let metrics = profiler.into_metrics();

        let edge_flows = graph
            .edges()
            .zip(&arcs)
            .map(|(edge, &arc)| {
                let flow = if graph.is_directed() || edge.source == edge.target {
                    network.edge(arc).flow
                } else {
                    // undirected edges report the net flow source -> target
                    network.edge(arc).flow - network.edge(arc + 2).flow
                };
                (graph.label(edge.source).clone(), graph.label(edge.target).clone(), flow)
            })
            .collect();

        let min_cut = Self::min_cut(graph, &network, s);
        info!(
            "{} max flow {:?} -> {:?}: {flow_value} ({} augmentations/pushes)",
            self.variant.as_str(),
            source,
            sink,
            metrics.steps_executed
        );
        debug!("min cut value {} over {} edges", min_cut.cut_value, min_cut.cut_edges.len());

        Ok(MaxFlowResult {
            flow_value,
            edge_flows,
            min_cut,
            metrics,
        })
    }

    fn min_cut<N: NodeLabel>(graph: &Graph<N>, network: &FlowNetwork, source: NodeId) -> MinCut<N> {
        let reachable = network.residual_reachable(source.0);
        let (inside, outside): (Vec<NodeId>, Vec<NodeId>) =
            graph.node_ids().partition(|id| reachable[id.0]);

        let mut cut_value = 0.0;
        let mut cut_edges = Vec::new();
        for edge in graph.edges() {
            let crossing = if graph.is_directed() {
                reachable[edge.source.0] && !reachable[edge.target.0]
            } else {
                reachable[edge.source.0] != reachable[edge.target.0]
            };
            if crossing {
                cut_value += edge.weight.0;
                cut_edges.push((graph.label(edge.source).clone(), graph.label(edge.target).clone()));
            }
        }

        let labels = |ids: Vec<NodeId>| ids.into_iter().map(|id| graph.label(id).clone()).collect();
        MinCut {
            cut_value,
            reachable: labels(inside),
            non_reachable: labels(outside),
            cut_edges,
        }
    }
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "max-flow"
    }

    fn category(&self) -> &'static str {
        "flow"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        match self.variant {
            MaxFlowVariant::EdmondsKarp => AlgorithmComplexity::new("O(V·E²)", "O(V+E)"),
            MaxFlowVariant::FordFulkerson => AlgorithmComplexity::new("O(E·|f*|)", "O(V+E)"),
            MaxFlowVariant::PushRelabelFifo => AlgorithmComplexity::new("O(V³)", "O(V+E)"),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::new(
            "variant",
            self.variant.as_str(),
            ParameterType::Enum(MaxFlowVariant::NAMES.iter().map(|s| s.to_string()).collect()),
        )]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.validate_parameter(name, value)?;
        if let Some(variant) = MaxFlowVariant::parse(value) {
            self.variant = variant;
        }
        Ok(())
    }
}

/// Replaces every capacity with a uniform integer from `range`
pub fn randomize_capacities<N: NodeLabel, R: Rng + ?Sized>(
    graph: &mut Graph<N>,
    rng: &mut R,
    range: RangeInclusive<u32>,
) -> Result<(), AlgorithmError> {
    if range.is_empty() {
        return Err(AlgorithmError::InvalidParameter {
            name: "capacity_range".into(),
            reason: format!("empty range {}..={}", range.start(), range.end()),
        });
    }
    let edges: Vec<_> = graph.edges().map(|e| (e.source, e.target)).collect();
    for (source, target) in edges {
        let capacity = rng.gen_range(range.clone());
        graph.set_edge_weight(source, target, EdgeWeight::new(f64::from(capacity)))?;
    }
    debug!("randomized {} capacities in {range:?}", graph.edge_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::GraphKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const ALL_VARIANTS: [MaxFlowVariant; 3] = [
        MaxFlowVariant::EdmondsKarp,
        MaxFlowVariant::FordFulkerson,
        MaxFlowVariant::PushRelabelFifo,
    ];

    fn lab_network() -> Graph<char> {
        Graph::from_weighted_edges(
            GraphKind::Directed,
            [
                ('S', 'A', 14.0), ('S', 'B', 12.0),
                ('A', 'C', 37.0), ('S', 'D', 29.0),
                ('B', 'D', 27.0), ('S', 'C', 31.0),
                ('C', 'E', 30.0), ('C', 'F', 23.0),
                ('D', 'F', 31.0), ('D', 'E', 28.0),
                ('E', 'H', 15.0), ('F', 'H', 20.0),
                ('F', 'G', 22.0), ('E', 'G', 16.0),
                ('G', 'T', 26.0), ('H', 'T', 25.0),
                ('G', 'H', 14.0),
            ],
        )
    }

    fn assert_valid_flow(graph: &Graph<char>, result: &MaxFlowResult<char>, source: char, sink: char) {
        for (u, v, flow) in &result.edge_flows {
            let capacity = graph
                .edge_weight(graph.require(u).unwrap(), graph.require(v).unwrap())
                .unwrap()
                .0;
            assert!(*flow >= -FLOW_EPSILON && *flow <= capacity + FLOW_EPSILON);
        }
        for &node in graph.labels() {
            if node == source || node == sink {
                continue;
            }
            let inflow: f64 = result.edge_flows.iter().filter(|e| e.1 == node).map(|e| e.2).sum();
            let outflow: f64 = result.edge_flows.iter().filter(|e| e.0 == node).map(|e| e.2).sum();
            assert!((inflow - outflow).abs() < 1e-6, "conservation broken at {node}");
        }
    }

    #[test]
    fn test_lab_network_max_flow_and_min_cut() {
        let graph = lab_network();
        for variant in ALL_VARIANTS {
            let result = MaxFlowSolver::new(variant).solve(&graph, &'S', &'T').unwrap();

            assert_eq!(result.flow_value, 51.0, "{variant:?}");
            assert_eq!(result.min_cut.cut_value, 51.0);
            assert_eq!(result.min_cut.cut_edges, vec![('H', 'T'), ('G', 'T')]);
            assert_eq!(result.min_cut.non_reachable, vec!['T']);
            assert_eq!(result.min_cut.reachable.len(), 9);
            assert_valid_flow(&graph, &result, 'S', 'T');
        }
    }

    #[test]
    fn test_randomized_capacities_keep_duality() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let mut graph = lab_network();
        for _ in 0..5 {
            randomize_capacities(&mut graph, &mut rng, 100..=1000).unwrap();
            for edge in graph.edges() {
                assert!((100.0..=1000.0).contains(&edge.weight.0));
                assert_eq!(edge.weight.0.fract(), 0.0);
            }

            let reference = MaxFlowSolver::default().solve(&graph, &'S', &'T').unwrap();
            assert!((reference.flow_value - reference.min_cut.cut_value).abs() < 1e-6);
            assert_valid_flow(&graph, &reference, 'S', 'T');

            for variant in ALL_VARIANTS {
                let other = MaxFlowSolver::new(variant).solve(&graph, &'S', &'T').unwrap();
                assert!((other.flow_value - reference.flow_value).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_disconnected_sink_has_zero_flow() {
        let mut graph = Graph::from_weighted_edges(GraphKind::Directed, [('S', 'A', 5.0)]);
        graph.add_node('T');
        let result = MaxFlowSolver::default().solve(&graph, &'S', &'T').unwrap();

        assert_eq!(result.flow_value, 0.0);
        assert_eq!(result.min_cut.cut_value, 0.0);
        assert!(result.min_cut.cut_edges.is_empty());
        assert_eq!(result.min_cut.reachable, vec!['S', 'A']);
    }

    #[test]
    fn test_undirected_network() {
        let graph = Graph::from_weighted_edges(
            GraphKind::Undirected,
            [('S', 'A', 3.0), ('A', 'T', 2.0), ('S', 'T', 1.0)],
        );
        let result = MaxFlowSolver::default().solve(&graph, &'S', &'T').unwrap();
        assert_eq!(result.flow_value, 3.0);
        assert_eq!(result.min_cut.cut_value, 3.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let graph = lab_network();
        let solver = MaxFlowSolver::default();
        assert!(matches!(
            solver.solve(&graph, &'S', &'S'),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
        assert!(matches!(solver.solve(&graph, &'S', &'Z'), Err(AlgorithmError::InvalidNode(_))));

        let negative = Graph::from_weighted_edges(GraphKind::Directed, [('S', 'T', -1.0)]);
        assert!(matches!(
            solver.solve(&negative, &'S', &'T'),
            Err(AlgorithmError::InvalidGraph(_))
        ));

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut copy = lab_network();
        #[allow(clippy::reversed_empty_ranges)]
        let empty = 10..=1;
        assert!(randomize_capacities(&mut copy, &mut rng, empty).is_err());
    }

    #[test]
    fn test_variant_parameter() {
        let mut solver = MaxFlowSolver::default();
        assert_eq!(solver.get_parameter("variant").as_deref(), Some("edmonds_karp"));
        solver.set_parameter("variant", "push_relabel_fifo").unwrap();
        assert_eq!(solver.variant(), MaxFlowVariant::PushRelabelFifo);
        assert!(solver.set_parameter("variant", "dinic").is_err());
    }
}
