// CLI subcommand definitions using clap derive macros
use clap::{Args, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{self, RunConfig};
use crate::error::LoadTestError;
use crate::reporter::{compare_results, read_json_result};

/// Batched HTTP load testing tool
#[derive(Parser, Debug, PartialEq)]
#[command(name = "http-load-test", version)]
pub enum Cli {
    /// Run a load test against a target service
    Run(RunArgs),
    /// Compare two JSON results written with --output
    Compare {
        /// Result of the current run
        current: PathBuf,
        /// Result of the previous run
        previous: PathBuf,
    },
}

/// How the final report is printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options of the `run` subcommand. Flags left unset fall back to the config
/// file, then to the built-in defaults (http://localhost:8000, 1000
/// requests, 10 concurrent).
#[derive(Args, Debug, PartialEq, Default)]
pub struct RunArgs {
    /// Target base URL
    #[arg(long)]
    pub url: Option<String>,
    /// Total number of requests
    #[arg(long)]
    pub requests: Option<u64>,
    /// Concurrent requests per batch
    #[arg(long)]
    pub concurrent: Option<u64>,
    /// Pause between batches in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Seed for endpoint selection
    #[arg(long)]
    pub seed: Option<u64>,
    /// Endpoint path to exercise (repeatable; replaces the default set)
    #[arg(long = "endpoint")]
    pub endpoints: Vec<String>,
    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write the JSON report to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    /// Build the run configuration: config file (if any), then flags.
    /// The result is not validated here; the driver does that.
    pub fn to_config(&self) -> Result<RunConfig, LoadTestError> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => RunConfig::default(),
        };
        self.apply_overrides(&mut cfg);
        Ok(cfg)
    }

    pub fn apply_overrides(&self, cfg: &mut RunConfig) {
        if let Some(url) = &self.url {
            cfg.target_url = url.clone();
        }
        if let Some(requests) = self.requests {
            cfg.total_requests = requests;
        }
        if let Some(concurrent) = self.concurrent {
            cfg.concurrency = concurrent;
        }
        if let Some(delay_ms) = self.delay_ms {
            cfg.batch_delay_ms = delay_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            cfg.request_timeout_ms = Some(timeout_ms);
        }
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if !self.endpoints.is_empty() {
            cfg.endpoints = self.endpoints.clone();
        }
    }
}

/// compare subcommand: load two JSON results and print the comparison as JSON.
pub fn run_compare(current_path: &Path, previous_path: &Path) -> Result<(), LoadTestError> {
    let current = read_json_result(current_path)?;
    let previous = read_json_result(previous_path)?;

    let report = compare_results(&current, &previous);
    let report_json = serde_json::to_string_pretty(&report)?;
    println!("{}", report_json);
    Ok(())
}
