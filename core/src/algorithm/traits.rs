//! Core algorithm trait definitions for the graph labs
//!
//! This module establishes the shared vocabulary every algorithm in the crate
//! speaks: dense node identifiers, the error enum, typed parameters with
//! validation, execution metrics and the `Algorithm` trait itself.
//!
//! # Key Design Principles
//! - Algorithms are plain structs configured through string parameters
//! - Every fallible operation returns `Result<_, AlgorithmError>`
//! - Metrics are collected by an `AlgorithmProfiler` owned by the run
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub constraints: Option<ParameterConstraints>,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Float,
    String,
    Boolean,
    Enum(Vec<String>),
}

/// Parameter constraints for validating algorithm parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed_values: Option<Vec<String>>,
}

impl AlgorithmParameter {
    pub fn new(name: &str, value: &str, value_type: ParameterType) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
            value_type,
            constraints: None,
        }
    }

    pub fn with_constraints(mut self, constraints: ParameterConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Checks a candidate value against the declared type and constraints
    pub fn validate(&self, value: &str) -> Result<(), AlgorithmError> {
        let invalid = |reason: String| AlgorithmError::InvalidParameter {
            name: self.name.clone(),
            reason,
        };

        let numeric = match &self.value_type {
            ParameterType::Integer => Some(
                value
                    .parse::<i64>()
                    .map_err(|_| invalid(format!("expected integer, got {value:?}")))?
                    as f64,
            ),
            ParameterType::Float => Some(
                value
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("expected float, got {value:?}")))?,
            ),
            ParameterType::Boolean => {
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("expected boolean, got {value:?}")))?;
                None
            }
            ParameterType::Enum(variants) => {
                if !variants.iter().any(|v| v == value) {
                    return Err(invalid(format!(
                        "expected one of {variants:?}, got {value:?}"
                    )));
                }
                None
            }
            ParameterType::String => None,
        };

        if let Some(constraints) = &self.constraints {
            if let Some(x) = numeric {
                if constraints.min.map_or(false, |min| x < min) {
                    return Err(invalid(format!("{x} is below minimum {:?}", constraints.min)));
                }
                if constraints.max.map_or(false, |max| x > max) {
                    return Err(invalid(format!("{x} is above maximum {:?}", constraints.max)));
                }
            }
            if let Some(allowed) = &constraints.allowed_values {
                if !allowed.iter().any(|v| v == value) {
                    return Err(invalid(format!("{value:?} is not an allowed value")));
                }
            }
        }

        Ok(())
    }
}

/// Comprehensive error types for algorithm operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Edge not found: {0} -> {1}")]
    EdgeNotFound(String, String),

    #[error("Invalid graph state: {0}")]
    InvalidGraph(String),

    #[error("Graph is not bipartite: odd cycle through {0}")]
    NotBipartite(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Algorithm not supported on given input: {0}")]
    NotSupported(String),
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub nodes_explored: usize,
    pub execution_time: Duration,
    pub custom_metrics: HashMap<String, f64>,
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

impl AlgorithmComplexity {
    pub fn new(time: &str, space: &str) -> Self {
        Self {
            time_complexity: time.to_owned(),
            space_complexity: space.to_owned(),
        }
    }
}

/// Read-only neighbourhood view consumed by traversal algorithms
///
/// Nodes are the dense identifiers `0..node_count()`.
pub trait Adjacency {
    fn node_count(&self) -> usize;

    fn neighbors(&self, node: NodeId) -> &[NodeId];
}

impl Adjacency for Vec<Vec<NodeId>> {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Main algorithm trait
///
/// Execution entry points are algorithm specific (a matcher and a flow solver
/// take different inputs), so the trait only covers description and
/// configuration.
pub trait Algorithm {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., matching, flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    /// Looks up the declared parameter and validates `value` against it
    fn validate_parameter(&self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.parameters()
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AlgorithmError::InvalidParameter {
                name: name.to_owned(),
                reason: format!("unknown parameter for {}", self.name()),
            })?
            .validate(value)
    }
}

/// Performance profiling for a single algorithm run
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_node_exploration(&mut self) {
        self.metrics.nodes_explored += 1;
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_custom(&mut self, key: &str, value: f64) {
        self.metrics.custom_metrics.insert(key.to_owned(), value);
    }

    pub fn into_metrics(mut self) -> AlgorithmMetrics {
        self.stop();
        self.metrics
    }
}
