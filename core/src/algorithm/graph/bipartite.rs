//! Bipartiteness testing, side partition and cycle-edge repair
//!
//! All routines here operate on undirected graphs; a directed graph is
//! rejected with `AlgorithmError::NotSupported`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Adjacency, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter, NodeId,
    ParameterType,
};
use crate::data_structures::graph::{Graph, NodeLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// How [`make_bipartite`] picks the edge to delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Delete the first edge of whichever cycle the DFS finds first
    #[default]
    FirstCycleEdge,
    /// Delete an edge whose ends got the same BFS colour; such an edge
    /// joins two nodes of one BFS layer and always lies on an odd cycle
    OddCycleEdge,
}

impl RepairStrategy {
    pub const NAMES: [&'static str; 2] = ["first_cycle_edge", "odd_cycle_edge"];

    pub fn as_str(self) -> &'static str {
        match self {
            RepairStrategy::FirstCycleEdge => Self::NAMES[0],
            RepairStrategy::OddCycleEdge => Self::NAMES[1],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "first_cycle_edge" => Some(RepairStrategy::FirstCycleEdge),
            "odd_cycle_edge" => Some(RepairStrategy::OddCycleEdge),
            _ => None,
        }
    }
}

fn require_undirected<N: NodeLabel>(graph: &Graph<N>) -> Result<(), AlgorithmError> {
    if graph.is_directed() {
        return Err(AlgorithmError::NotSupported(
            "bipartite routines expect an undirected graph".into(),
        ));
    }
    Ok(())
}

/// BFS colouring; on failure returns the edge joining two same-coloured nodes
fn color_or_conflict<A: Adjacency>(graph: &A) -> Result<Vec<Side>, (NodeId, NodeId)> {
    let n = graph.node_count();
    let mut colors: Vec<Option<Side>> = vec![None; n];
    let mut queue = VecDeque::new();

    for root in 0..n {
        if colors[root].is_some() {
            continue;
        }
        colors[root] = Some(Side::Left);
        queue.push_back(NodeId(root));

        while let Some(u) = queue.pop_front() {
            let side = colors[u.0].unwrap_or(Side::Left);
            for &v in graph.neighbors(u) {
                match colors[v.0] {
                    None => {
                        colors[v.0] = Some(side.opposite());
                        queue.push_back(v);
                    }
                    Some(other) if other == side => return Err((u, v)),
                    Some(_) => {}
                }
            }
        }
    }

    Ok(colors.into_iter().map(|c| c.unwrap_or(Side::Left)).collect())
}

/// Two-colouring indexed by `NodeId`; the first node of each component is `Left`
pub fn two_coloring<N: NodeLabel>(graph: &Graph<N>) -> Result<Vec<Side>, AlgorithmError> {
    require_undirected(graph)?;
    color_or_conflict(graph).map_err(|(u, v)| {
        AlgorithmError::NotBipartite(format!("{:?} - {:?}", graph.label(u), graph.label(v)))
    })
}

pub fn is_bipartite<N: NodeLabel>(graph: &Graph<N>) -> Result<bool, AlgorithmError> {
    require_undirected(graph)?;
    Ok(color_or_conflict(graph).is_ok())
}

/// Splits the nodes into `(left, right)`, each in insertion order
pub fn bipartite_sets<N: NodeLabel>(
    graph: &Graph<N>,
) -> Result<(Vec<NodeId>, Vec<NodeId>), AlgorithmError> {
    let colors = two_coloring(graph)?;
    Ok(graph.node_ids().partition(|id| colors[id.0] == Side::Left))
}

/// First cycle met by a DFS over nodes in insertion order
///
/// The cycle is returned as consecutive edges; the first edge leaves the
/// node where the cycle was entered and the last one closes it.
pub fn find_cycle<N: NodeLabel>(graph: &Graph<N>) -> Option<Vec<(NodeId, NodeId)>> {
    let n = graph.node_count();
    let directed = graph.is_directed();
    let mut visited = vec![false; n];
    let mut position: Vec<Option<usize>> = vec![None; n];

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        position[root] = Some(0);
        let mut path = vec![NodeId(root)];
        let mut cursor = vec![0usize];

        while let Some(&u) = path.last() {
            let depth = path.len() - 1;
            let neighbors = graph.neighbors(u);
            if cursor[depth] == neighbors.len() {
                position[u.0] = None;
                path.pop();
                cursor.pop();
                continue;
            }

            let v = neighbors[cursor[depth]];
            cursor[depth] += 1;

            if !directed && depth > 0 && v == path[depth - 1] {
                continue;
            }
            if let Some(start) = position[v.0] {
                let mut cycle: Vec<_> = path[start..].windows(2).map(|w| (w[0], w[1])).collect();
                cycle.push((u, v));
                return Some(cycle);
            }
            if !visited[v.0] {
                visited[v.0] = true;
                position[v.0] = Some(path.len());
                path.push(v);
                cursor.push(0);
            }
        }
    }

    None
}

/// Bipartite copy of a graph together with the edges deleted to get there
#[derive(Debug, Clone)]
pub struct BipartiteRepair<N> {
    pub graph: Graph<N>,
    pub removed_edges: Vec<(N, N)>,
}

impl<N> BipartiteRepair<N> {
    pub fn was_modified(&self) -> bool {
        !self.removed_edges.is_empty()
    }
}

/// Deletes edges until the graph is bipartite
///
/// With `FirstCycleEdge`, running out of cycles ends the loop even if the
/// graph is still not bipartite; that cannot happen on a simple undirected
/// graph but the exit is kept instead of an error.
pub fn make_bipartite<N: NodeLabel>(
    graph: &Graph<N>,
    strategy: RepairStrategy,
) -> Result<BipartiteRepair<N>, AlgorithmError> {
    require_undirected(graph)?;
    let mut repaired = graph.clone();
    let mut removed_edges = Vec::new();

    loop {
        let (u, v) = match (color_or_conflict(&repaired), strategy) {
            (Ok(_), _) => break,
            (Err(conflict), RepairStrategy::OddCycleEdge) => conflict,
            (Err(_), RepairStrategy::FirstCycleEdge) => match find_cycle(&repaired) {
                Some(cycle) => cycle[0],
                None => {
                    debug!("no cycle left to break");
                    break;
                }
            },
        };
        repaired.remove_edge(u, v)?;
        debug!("removed edge {:?} - {:?}", repaired.label(u), repaired.label(v));
        removed_edges.push((repaired.label(u).clone(), repaired.label(v).clone()));
    }

    info!(
        "bipartite repair ({}) removed {} edge(s)",
        strategy.as_str(),
        removed_edges.len()
    );
    Ok(BipartiteRepair {
        graph: repaired,
        removed_edges,
    })
}

/// Parameterised front end over [`make_bipartite`]
#[derive(Debug, Clone, Default)]
pub struct BipartiteRepairer {
    strategy: RepairStrategy,
}

impl BipartiteRepairer {
    pub fn new(strategy: RepairStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> RepairStrategy {
        self.strategy
    }

    pub fn repair<N: NodeLabel>(&self, graph: &Graph<N>) -> Result<BipartiteRepair<N>, AlgorithmError> {
        make_bipartite(graph, self.strategy)
    }
}

impl Algorithm for BipartiteRepairer {
    fn name(&self) -> &'static str {
        "bipartite-repair"
    }

    fn category(&self) -> &'static str {
        "bipartite"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(E·(V+E))", "O(V+E)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::new(
            "strategy",
            self.strategy.as_str(),
            ParameterType::Enum(RepairStrategy::NAMES.iter().map(|s| s.to_string()).collect()),
        )]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.validate_parameter(name, value)?;
        if let Some(strategy) = RepairStrategy::parse(value) {
            self.strategy = strategy;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::GraphKind;

    fn triangle_with_tail() -> Graph<u32> {
        Graph::from_edges(GraphKind::Undirected, [(1, 2), (2, 3), (3, 1), (3, 4)])
    }

    #[test]
    fn test_even_cycle_is_bipartite() {
        let square = Graph::from_edges(GraphKind::Undirected, [(1, 2), (2, 3), (3, 4), (4, 1)]);
        assert!(is_bipartite(&square).unwrap());

        let (left, right) = bipartite_sets(&square).unwrap();
        let labels = |ids: &[NodeId]| ids.iter().map(|&id| *square.label(id)).collect::<Vec<_>>();
        assert_eq!(labels(&left), vec![1, 3]);
        assert_eq!(labels(&right), vec![2, 4]);
    }

    #[test]
    fn test_odd_cycle_is_not_bipartite() {
        let graph = triangle_with_tail();
        assert!(!is_bipartite(&graph).unwrap());
        assert!(matches!(bipartite_sets(&graph), Err(AlgorithmError::NotBipartite(_))));
    }

    #[test]
    fn test_directed_graph_rejected() {
        let graph = Graph::from_edges(GraphKind::Directed, [(1, 2)]);
        assert!(matches!(is_bipartite(&graph), Err(AlgorithmError::NotSupported(_))));
    }

    #[test]
    fn test_find_cycle() {
        let graph = triangle_with_tail();
        let cycle = find_cycle(&graph).unwrap();
        let labelled: Vec<_> = cycle
            .iter()
            .map(|&(u, v)| (*graph.label(u), *graph.label(v)))
            .collect();
        assert_eq!(labelled, vec![(1, 2), (2, 3), (3, 1)]);

        let tree = Graph::from_edges(GraphKind::Undirected, [(1, 2), (2, 3), (2, 4)]);
        assert!(find_cycle(&tree).is_none());
    }

    #[test]
    fn test_find_directed_cycle() {
        let dag = Graph::from_edges(GraphKind::Directed, [(1, 2), (1, 3), (2, 3)]);
        assert!(find_cycle(&dag).is_none());

        let cyclic = Graph::from_edges(GraphKind::Directed, [(1, 2), (2, 3), (3, 2)]);
        let cycle = find_cycle(&cyclic).unwrap();
        assert_eq!(cycle.len(), 2);
    }

    #[test]
    fn test_repair_first_cycle_edge() {
        let graph = triangle_with_tail();
        let repair = make_bipartite(&graph, RepairStrategy::FirstCycleEdge).unwrap();

        assert_eq!(repair.removed_edges, vec![(1, 2)]);
        assert!(is_bipartite(&repair.graph).unwrap());
        assert_eq!(repair.graph.edge_count(), 3);
    }

    #[test]
    fn test_repair_odd_cycle_edge_removes_colour_conflicts() {
        // square 1-2-3-4 plus chord 1-3 closing two triangles
        let graph = Graph::from_edges(
            GraphKind::Undirected,
            [(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)],
        );
        let repair = make_bipartite(&graph, RepairStrategy::OddCycleEdge).unwrap();

        assert!(is_bipartite(&repair.graph).unwrap());
        assert_eq!(repair.removed_edges, vec![(2, 3), (4, 3)]);

        // replaying the removals: each edge was the same-colour conflict at its turn
        let mut current = graph.clone();
        for &(u, v) in &repair.removed_edges {
            let (a, b) = color_or_conflict(&current).unwrap_err();
            assert_eq!((*current.label(a), *current.label(b)), (u, v));
            current.remove_edge(a, b).unwrap();
        }
        assert!(color_or_conflict(&current).is_ok());

        // 1-2 and 1-4 are BFS tree edges from node 1
        assert!(repair.graph.has_edge(NodeId(0), NodeId(1)));
        assert!(repair.graph.has_edge(NodeId(0), NodeId(3)));
    }

    #[test]
    fn test_repair_of_bipartite_graph_is_noop() {
        let graph = Graph::from_edges(GraphKind::Undirected, [(1, 2), (2, 3)]);
        let repair = BipartiteRepairer::default().repair(&graph).unwrap();
        assert!(!repair.was_modified());
        assert_eq!(repair.graph.edge_count(), 2);
    }

    #[test]
    fn test_strategy_parameter() {
        let mut repairer = BipartiteRepairer::default();
        repairer.set_parameter("strategy", "odd_cycle_edge").unwrap();
        assert_eq!(repairer.strategy(), RepairStrategy::OddCycleEdge);
        assert_eq!(repairer.get_parameter("strategy").as_deref(), Some("odd_cycle_edge"));
        assert!(repairer.set_parameter("strategy", "random").is_err());
        assert!(repairer.set_parameter("depth", "3").is_err());
    }
}
