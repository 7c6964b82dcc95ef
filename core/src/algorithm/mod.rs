//! graphlab algorithm layer
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod graph;
pub mod combinatorics;

pub use self::traits::*;
pub use self::graph::*;
pub use self::combinatorics::{count_arrangements, ArrangementCount, LetterMultiset};
