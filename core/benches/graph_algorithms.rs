use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use graphlab_core::algorithm::graph::{
    bipartite_sets, make_bipartite, max_matching, FloydWarshall, RepairStrategy,
};
use graphlab_core::data_structures::generators::{connected_sparse_graph, graph_with_planted_cliques};

fn bench_floyd_warshall(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let (graph, _) = graph_with_planted_cliques(220, &mut rng).unwrap();

    for parallel in [false, true] {
        let solver = FloydWarshall::new(parallel);
        c.bench_function(&format!("floyd_warshall_220_parallel_{parallel}"), |b| {
            b.iter(|| solver.execute(black_box(&graph)).unwrap())
        });
    }
}

fn bench_kuhn_matching(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let sparse = connected_sparse_graph(400, &mut rng);
    let graph = make_bipartite(&sparse, RepairStrategy::OddCycleEdge).unwrap().graph;
    let (left, _) = bipartite_sets(&graph).unwrap();

    c.bench_function("kuhn_matching_400", |b| {
        b.iter(|| max_matching(black_box(&graph), black_box(&left)))
    });
}

criterion_group!(benches, bench_floyd_warshall, bench_kuhn_matching);
criterion_main!(benches);
