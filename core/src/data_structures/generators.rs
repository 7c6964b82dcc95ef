//! Random graph generators with planted structures
//!
//! `connected_sparse_graph` samples G(n, p) once and then stitches the
//! leftover components together with a union-find pass, so connectivity is
//! reached in a single draw instead of by resampling until lucky.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, NodeId};
use crate::data_structures::graph::{EdgeWeight, Graph, NodeLabel};
use crate::data_structures::union_find::UnionFind;

/// Size of the planted complete graph
pub const CLIQUE_SIZE: usize = 6;

/// Side sizes of the planted complete bipartite graph
pub const BIPARTITE_CLIQUE_SIDES: (usize, usize) = (3, 5);

/// Node sets of the structures planted by [`graph_with_planted_cliques`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantedCliques {
    pub clique: Vec<usize>,
    pub bipartite: Option<(Vec<usize>, Vec<usize>)>,
}

/// Edge probability giving an expected degree of `floor(sqrt(n))`
pub fn sparse_edge_probability(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let avg_degree = (n as f64).sqrt().floor();
    avg_degree / n as f64
}

/// Samples a connected G(n, p) style graph on nodes `0..n`
pub fn connected_sparse_graph<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Graph<usize> {
    let mut graph = Graph::undirected();
    for v in 0..n {
        graph.add_node(v);
    }

    let p = sparse_edge_probability(n);
    let mut components = UnionFind::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(p) {
                graph.connect(NodeId(u), NodeId(v), EdgeWeight::UNIT);
                components.union(u, v);
            }
        }
    }

    let sampled_edges = graph.edge_count();
    let sampled_components = components.component_count();
    let mut groups = components.groups().into_iter();
    if let Some(mut connected) = groups.next() {
        for group in groups {
            let (Some(&a), Some(&b)) = (group.choose(rng), connected.choose(rng)) else {
                continue;
            };
            trace!("joining component of {} to {} via ({a}, {b})", group.len(), connected.len());
            graph.connect(NodeId(a), NodeId(b), EdgeWeight::UNIT);
            components.union(a, b);
            connected.extend(group);
        }
    }

    debug!(
        "sparse graph n={n} p={p:.4}: {sampled_edges} sampled edges in {sampled_components} components, \
         {} bridging edges, {} component(s) left",
        graph.edge_count() - sampled_edges,
        components.component_count()
    );
    graph
}

/// Adds every edge among `nodes`
pub fn insert_clique<N: NodeLabel>(graph: &mut Graph<N>, nodes: &[N]) {
    for (i, u) in nodes.iter().enumerate() {
        for v in &nodes[i + 1..] {
            graph.add_edge(u.clone(), v.clone());
        }
    }
}

/// Adds every edge of `part1 x part2`
pub fn insert_complete_bipartite<N: NodeLabel>(graph: &mut Graph<N>, part1: &[N], part2: &[N]) {
    for u in part1 {
        for v in part2 {
            graph.add_edge(u.clone(), v.clone());
        }
    }
}

/// Sparse connected graph with a planted K6 and, space permitting, a K3,5
pub fn graph_with_planted_cliques<R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> Result<(Graph<usize>, PlantedCliques), AlgorithmError> {
    if n < CLIQUE_SIZE {
        return Err(AlgorithmError::InvalidParameter {
            name: "n".into(),
            reason: format!("need at least {CLIQUE_SIZE} nodes to plant a clique, got {n}"),
        });
    }

    let mut graph = connected_sparse_graph(n, rng);
    let nodes: Vec<usize> = (0..n).collect();

    let clique: Vec<usize> = nodes.choose_multiple(rng, CLIQUE_SIZE).copied().collect();
    insert_clique(&mut graph, &clique);

    let (left_size, right_size) = BIPARTITE_CLIQUE_SIDES;
    let remaining: Vec<usize> = nodes.into_iter().filter(|v| !clique.contains(v)).collect();
    let bipartite = if remaining.len() >= left_size + right_size {
        let left: Vec<usize> = remaining.choose_multiple(rng, left_size).copied().collect();
        let rest: Vec<usize> = remaining.into_iter().filter(|v| !left.contains(v)).collect();
        let right: Vec<usize> = rest.choose_multiple(rng, right_size).copied().collect();
        insert_complete_bipartite(&mut graph, &left, &right);
        Some((left, right))
    } else {
        debug!("n={n}: not enough nodes left for K{left_size},{right_size}");
        None
    };

    Ok((graph, PlantedCliques { clique, bipartite }))
}

/// Breadth-first connectivity check
pub fn is_connected<N: NodeLabel>(graph: &Graph<N>) -> bool {
    use crate::algorithm::traits::Adjacency;

    let n = graph.node_count();
    if n == 0 {
        return true;
    }
    let mut seen = vec![false; n];
    let mut stack = vec![NodeId(0)];
    seen[0] = true;
    let mut reached = 1;
    while let Some(u) = stack.pop() {
        for &v in graph.neighbors(u) {
            if !seen[v.0] {
                seen[v.0] = true;
                reached += 1;
                stack.push(v);
            }
        }
    }
    reached == n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::traits::Adjacency;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_sparse_graphs_are_connected() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for n in [1, 2, 5, 15, 33, 77, 220] {
            let graph = connected_sparse_graph(n, &mut rng);
            assert_eq!(graph.node_count(), n);
            assert!(is_connected(&graph), "n={n} not connected");
        }
    }

    #[test]
    fn test_empty_graph() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let graph = connected_sparse_graph(0, &mut rng);
        assert!(graph.is_empty());
        assert!(is_connected(&graph));
    }

    #[test]
    fn test_edge_probability() {
        assert_eq!(sparse_edge_probability(0), 0.0);
        assert_eq!(sparse_edge_probability(1), 1.0);
        assert!((sparse_edge_probability(15) - 3.0 / 15.0).abs() < 1e-12);
        assert!((sparse_edge_probability(350) - 18.0 / 350.0).abs() < 1e-12);
    }

    #[test]
    fn test_planted_structures_are_complete() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (graph, planted) = graph_with_planted_cliques(33, &mut rng).unwrap();

        assert_eq!(planted.clique.len(), CLIQUE_SIZE);
        for (i, &u) in planted.clique.iter().enumerate() {
            for &v in &planted.clique[i + 1..] {
                assert!(graph.has_edge(NodeId(u), NodeId(v)));
            }
        }

        let (left, right) = planted.bipartite.expect("33 nodes leave room for K3,5");
        assert_eq!((left.len(), right.len()), BIPARTITE_CLIQUE_SIDES);
        for &u in &left {
            assert!(!planted.clique.contains(&u));
            assert!(!right.contains(&u));
            for &v in &right {
                assert!(graph.has_edge(NodeId(u), NodeId(v)));
            }
        }
        assert!(is_connected(&graph));
    }

    #[test]
    fn test_small_graph_skips_bipartite_clique() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let (graph, planted) = graph_with_planted_cliques(10, &mut rng).unwrap();
        assert!(planted.bipartite.is_none());
        assert_eq!(graph.node_count(), 10);
    }

    #[test]
    fn test_too_small_for_clique() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        assert!(matches!(
            graph_with_planted_cliques(5, &mut rng),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
    }
}
