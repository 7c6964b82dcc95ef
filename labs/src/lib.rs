//! # graphlab labs
//!
//! Runners for the four lab exercises built on `graphlab-core`. Each runner
//! takes a [`LabConfig`] and returns a report that prints as console text
//! and serializes to JSON; the binaries in `src/bin` only pick the runner.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod arrangements;
pub mod cliques;
pub mod config;
pub mod error;
pub mod flow;
pub mod matching;

use std::fmt::Display;
use std::io::Write;
use std::process::ExitCode;

use log::{error, info};
use serde::Serialize;

pub use config::{LabConfig, OutputFormat};
pub use error::LabError;

/// Installs `env_logger`, `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // a logger installed by an earlier call (tests) is kept
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

/// Writes `report` to `out` in the requested format
pub fn render<R, W>(report: &R, format: OutputFormat, out: &mut W) -> Result<(), LabError>
where
    R: Serialize + Display,
    W: Write,
{
    match format {
        OutputFormat::Text => writeln!(out, "{report}")?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Shared `main` body: configure, run, print
pub fn run_lab<R, F>(lab: &str, run: F) -> ExitCode
where
    R: Serialize + Display,
    F: FnOnce(&LabConfig) -> Result<R, LabError>,
{
    init_logging();
    let outcome = LabConfig::load().and_then(|config| {
        info!("running {lab} lab");
        let report = run(&config)?;
        render(&report, config.output, &mut std::io::stdout().lock())
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{lab} lab failed: {e}");
            ExitCode::FAILURE
        }
    }
}
