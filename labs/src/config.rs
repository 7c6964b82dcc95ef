//! Lab configuration
//!
//! Every field has a default reproducing the original exercise, so an empty
//! JSON object (or no file at all) is a valid configuration. The file is
//! picked up from the path in `GRAPHLAB_CONFIG`.
//!
//! Algorithm tuning goes through the `parameters` table, keyed by algorithm
//! name and handed to `Algorithm::set_parameter`:
//!
//! ```json
//! { "parameters": { "max-flow": { "variant": "push_relabel_fifo" } } }
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use graphlab_core::Algorithm;

use crate::error::LabError;

pub const CONFIG_ENV: &str = "GRAPHLAB_CONFIG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub output: OutputFormat,
    /// Fixed RNG seed; entropy-seeded when absent
    pub seed: Option<u64>,
    /// `algorithm name -> parameter name -> value`
    pub parameters: BTreeMap<String, BTreeMap<String, String>>,
    pub arrangements: ArrangementsConfig,
    pub cliques: CliquesConfig,
    pub max_flow: MaxFlowConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementsConfig {
    /// Letters with their maximum multiplicity
    pub letters: Vec<(char, usize)>,
    pub length: usize,
}

impl Default for ArrangementsConfig {
    fn default() -> Self {
        Self {
            letters: vec![
                ('Ч', 1), ('Е', 2), ('Р', 1), ('С', 2), ('П', 1),
                ('О', 2), ('Л', 1), ('И', 2), ('Ц', 1), ('А', 1),
            ],
            length: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliquesConfig {
    pub sizes: Vec<usize>,
    /// Side of the printed top-left distance block
    pub preview: usize,
}

impl Default for CliquesConfig {
    fn default() -> Self {
        Self {
            sizes: vec![15, 33, 77, 220, 350],
            preview: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxFlowConfig {
    /// Directed `(from, to, capacity)` edges
    pub network: Vec<(String, String, f64)>,
    pub source: String,
    pub sink: String,
    pub capacity_min: u32,
    pub capacity_max: u32,
}

impl Default for MaxFlowConfig {
    fn default() -> Self {
        let network = [
            ("S", "A", 14.0), ("S", "B", 12.0),
            ("A", "C", 37.0), ("S", "D", 29.0),
            ("B", "D", 27.0), ("S", "C", 31.0),
            ("C", "E", 30.0), ("C", "F", 23.0),
            ("D", "F", 31.0), ("D", "E", 28.0),
            ("E", "H", 15.0), ("F", "H", 20.0),
            ("F", "G", 22.0), ("E", "G", 16.0),
            ("G", "T", 26.0), ("H", "T", 25.0),
            ("G", "H", 14.0),
        ];
        Self {
            network: network
                .iter()
                .map(|&(u, v, c)| (u.to_owned(), v.to_owned(), c))
                .collect(),
            source: "S".into(),
            sink: "T".into(),
            capacity_min: 100,
            capacity_max: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Undirected edges of the graph to match
    pub edges: Vec<(u32, u32)>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            edges: vec![
                (4, 13), (3, 10), (10, 13), (8, 12), (10, 16), (9, 13),
                (2, 13), (10, 15), (8, 14), (5, 6), (4, 6), (4, 12), (2, 7),
                (7, 9), (10, 14), (10, 12), (8, 16), (4, 15), (9, 15),
                (3, 5), (4, 7), (5, 15), (3, 9), (10, 11), (5, 11), (2, 11),
                (7, 10), (2, 15), (2, 14), (4, 14), (7, 8), (3, 8), (5, 16),
                (2, 12), (5, 7),
            ],
        }
    }
}

impl LabConfig {
    /// Reads `GRAPHLAB_CONFIG` if set, defaults otherwise
    pub fn load() -> Result<Self, LabError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => {
                debug!("{CONFIG_ENV} not set, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LabError> {
        let text = std::fs::read_to_string(path).map_err(|source| LabError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| LabError::ConfigParse {
            path: path.to_owned(),
            source,
        })?;
        info!("loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LabError> {
        if self.max_flow.capacity_min > self.max_flow.capacity_max {
            return Err(LabError::InvalidConfig(format!(
                "max_flow.capacity_min {} exceeds capacity_max {}",
                self.max_flow.capacity_min, self.max_flow.capacity_max
            )));
        }
        if self.max_flow.source == self.max_flow.sink {
            return Err(LabError::InvalidConfig("max_flow.source equals max_flow.sink".into()));
        }
        Ok(())
    }

    pub fn rng(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }

    /// Applies the `parameters` entry named after `algorithm`, if any
    pub fn configure<A: Algorithm>(&self, algorithm: &mut A) -> Result<(), LabError> {
        if let Some(values) = self.parameters.get(algorithm.name()) {
            for (name, value) in values {
                algorithm.set_parameter(name, value)?;
                debug!("{}: {name} = {value}", algorithm.name());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlab_core::algorithm::graph::{MaxFlowSolver, MaxFlowVariant};

    #[test]
    fn test_empty_json_gives_defaults() {
        let config: LabConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LabConfig::default());
        assert_eq!(config.cliques.sizes, vec![15, 33, 77, 220, 350]);
        assert_eq!(config.max_flow.network.len(), 17);
        assert_eq!(config.matching.edges.len(), 35);
    }

    #[test]
    fn test_partial_override() {
        let config: LabConfig = serde_json::from_str(
            r#"{ "output": "json", "seed": 9, "cliques": { "sizes": [20] } }"#,
        )
        .unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.cliques.sizes, vec![20]);
        assert_eq!(config.cliques.preview, 15);
    }

    #[test]
    fn test_parameters_reach_the_algorithm() {
        let config: LabConfig = serde_json::from_str(
            r#"{ "parameters": { "max-flow": { "variant": "ford_fulkerson" } } }"#,
        )
        .unwrap();
        let mut solver = MaxFlowSolver::default();
        config.configure(&mut solver).unwrap();
        assert_eq!(solver.variant(), MaxFlowVariant::FordFulkerson);

        let bad: LabConfig = serde_json::from_str(
            r#"{ "parameters": { "max-flow": { "variant": "simplex" } } }"#,
        )
        .unwrap();
        assert!(matches!(
            bad.configure(&mut MaxFlowSolver::default()),
            Err(LabError::Algorithm(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = LabConfig::default();
        config.max_flow.capacity_min = 2000;
        assert!(matches!(config.validate(), Err(LabError::InvalidConfig(_))));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = LabConfig {
            seed: Some(5),
            ..LabConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
