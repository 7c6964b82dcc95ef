//! Graph algorithms used by the labs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bipartite;
pub mod matching;
pub mod max_flow;
pub mod shortest_path;

pub use self::bipartite::{
    bipartite_sets, find_cycle, is_bipartite, make_bipartite, two_coloring, BipartiteRepair,
    BipartiteRepairer, RepairStrategy, Side,
};
pub use self::matching::{
    extend_matching, max_matching, max_matching_via_flow, KuhnMatching, LeftOrder, Matching,
    MatchingResult,
};
pub use self::max_flow::{
    randomize_capacities, FlowNetwork, MaxFlowResult, MaxFlowSolver, MaxFlowVariant, MinCut,
};
pub use self::shortest_path::{DistanceMatrix, FloydWarshall, ShortestPathResult};
