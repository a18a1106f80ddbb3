// Reporter module - summary statistics, rendering and JSON output
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::LoadTestError;
use crate::outcome::Status;
use crate::stats::{mean, percentile, AggregateState};

/// Where and when a run happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub target_url: String,
    pub concurrency: u64,
    pub started_at: String,
    pub finished_at: String,
}

/// Final summary of a run. Derived once from the aggregate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    #[serde(default)]
    pub run: RunInfo,
    pub duration_seconds: f64,
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub average_latency_ms: f64,
    pub p95_latency_ms: f64,
    #[serde(default)]
    pub requests_per_second: f64,
    pub status_histogram: BTreeMap<Status, u64>,
}

impl SummaryReport {
    pub fn with_run_info(mut self, run: RunInfo) -> Self {
        self.run = run;
        self
    }

    /// Share of requests that were not 2xx, 0.0 for an empty run.
    pub fn error_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.error_count as f64 / self.total_requests as f64
        }
    }
}

/// Compute the summary for a finished run. Pure: the same state and
/// duration always give the same report.
pub fn summarize(state: &AggregateState, duration_seconds: f64) -> SummaryReport {
    let total_requests = state.total();
    let requests_per_second = if duration_seconds > 0.0 {
        total_requests as f64 / duration_seconds
    } else {
        0.0
    };

    SummaryReport {
        run: RunInfo::default(),
        duration_seconds,
        total_requests,
        success_count: state.success_count,
        error_count: state.error_count,
        average_latency_ms: mean(&state.latencies) * 1000.0,
        p95_latency_ms: percentile(&state.latencies, 95.0) * 1000.0,
        requests_per_second,
        status_histogram: state
            .status_histogram
            .iter()
            .map(|(status, count)| (*status, *count))
            .collect(),
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Load Test Results ===")?;
        if !self.run.target_url.is_empty() {
            writeln!(f, "Target:                  {}", self.run.target_url)?;
            writeln!(f, "Concurrency:             {}", self.run.concurrency)?;
        }
        writeln!(f, "Duration:                {:.2} seconds", self.duration_seconds)?;
        writeln!(f, "Total Requests:          {}", self.total_requests)?;
        writeln!(f, "Successful Requests:     {}", self.success_count)?;
        writeln!(f, "Failed Requests:         {}", self.error_count)?;
        writeln!(f, "Average Latency:         {:.2}ms", self.average_latency_ms)?;
        writeln!(f, "95th Percentile Latency: {:.2}ms", self.p95_latency_ms)?;
        writeln!(f, "Throughput:              {:.1} req/s", self.requests_per_second)?;
        writeln!(f)?;
        writeln!(f, "Status Code Distribution:")?;
        if self.status_histogram.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (status, count) in &self.status_histogram {
            writeln!(f, "  {}: {}", status, count)?;
        }
        write!(f, "=========================")
    }
}

/// Print the human-readable report to stdout.
pub fn display_summary(report: &SummaryReport) {
    println!("{}", report);
}

/// Write the report as pretty-printed JSON.
pub fn write_json_result(report: &SummaryReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a report previously written by `write_json_result`.
pub fn read_json_result(path: &Path) -> Result<SummaryReport, LoadTestError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LoadTestError::ConfigError(format!(
            "Failed to read result file '{}': {}",
            path.display(),
            e
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        LoadTestError::ConfigError(format!(
            "Failed to parse result file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Difference between two runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub throughput_change_pct: f64,
    pub average_latency_change_pct: f64,
    pub p95_latency_change_pct: f64,
    pub error_rate_change: f64,
    pub improvements: Vec<String>,
    pub regressions: Vec<String>,
}

/// Percentage change; 0.0 when `previous` is 0.
fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Compare a run against a previous one.
pub fn compare_results(current: &SummaryReport, previous: &SummaryReport) -> ComparisonReport {
    let throughput_change_pct =
        pct_change(current.requests_per_second, previous.requests_per_second);
    let average_latency_change_pct =
        pct_change(current.average_latency_ms, previous.average_latency_ms);
    let p95_latency_change_pct = pct_change(current.p95_latency_ms, previous.p95_latency_ms);
    let error_rate_change = current.error_rate() - previous.error_rate();

    let mut improvements = Vec::new();
    let mut regressions = Vec::new();

    // Throughput: higher is better
    if throughput_change_pct > 0.0 {
        improvements.push(format!("Throughput improved by {:.1}%", throughput_change_pct));
    } else if throughput_change_pct < 0.0 {
        regressions.push(format!(
            "Throughput regressed by {:.1}%",
            throughput_change_pct.abs()
        ));
    }

    // Latency: lower is better
    for (name, change) in [
        ("Average latency", average_latency_change_pct),
        ("p95 latency", p95_latency_change_pct),
    ] {
        if change < 0.0 {
            improvements.push(format!("{} improved by {:.1}%", name, change.abs()));
        } else if change > 0.0 {
            regressions.push(format!("{} regressed by {:.1}%", name, change));
        }
    }

    if error_rate_change < 0.0 {
        improvements.push(format!(
            "Error rate improved by {:.4}",
            error_rate_change.abs()
        ));
    } else if error_rate_change > 0.0 {
        regressions.push(format!("Error rate regressed by {:.4}", error_rate_change));
    }

    ComparisonReport {
        throughput_change_pct,
        average_latency_change_pct,
        p95_latency_change_pct,
        error_rate_change,
        improvements,
        regressions,
    }
}
