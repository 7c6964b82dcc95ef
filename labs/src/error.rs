//! Lab failures
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use graphlab_core::AlgorithmError;

/// Everything a lab run can fail with
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    #[error("Cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
