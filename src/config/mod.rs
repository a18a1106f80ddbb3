// Configuration manager module
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::endpoints::{EndpointSet, DEFAULT_ENDPOINTS};
use crate::error::LoadTestError;

pub const DEFAULT_TARGET_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOTAL_REQUESTS: u64 = 1000;
pub const DEFAULT_CONCURRENCY: u64 = 10;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;

/// Settings for one load run. Immutable once the run has started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub target_url: String,
    pub total_requests: u64,
    pub concurrency: u64,
    /// Pause between the end of one batch and the start of the next.
    pub batch_delay_ms: u64,
    /// Per-call deadline; an expired call is recorded as a transport error.
    pub request_timeout_ms: Option<u64>,
    pub endpoints: Vec<String>,
    /// Fixes the endpoint selection sequence when set.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            total_requests: DEFAULT_TOTAL_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            request_timeout_ms: None,
            endpoints: DEFAULT_ENDPOINTS.iter().map(|p| p.to_string()).collect(),
            seed: None,
        }
    }
}

impl RunConfig {
    /// Check every field and collect all problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.target_url.trim().is_empty() {
            errors.push("target_url must not be empty".to_string());
        }
        if self.concurrency == 0 {
            errors.push("concurrency must be greater than 0".to_string());
        }
        if self.endpoints.is_empty() {
            errors.push("endpoints must contain at least one path".to_string());
        }
        if self.request_timeout_ms == Some(0) {
            errors.push("request_timeout_ms must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into a single `ConfigError`.
    pub fn ensure_valid(&self) -> Result<(), LoadTestError> {
        self.validate().map_err(|errors| {
            LoadTestError::ConfigError(format!("Validation errors: {}", errors.join("; ")))
        })
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn endpoint_set(&self) -> Result<EndpointSet, LoadTestError> {
        EndpointSet::new(self.endpoints.clone())
    }
}

/// Parse a JSON config and validate it.
pub fn load_from_str(json: &str) -> Result<RunConfig, LoadTestError> {
    let config: RunConfig = serde_json::from_str(json)
        .map_err(|e| LoadTestError::ConfigError(format!("JSON parse error: {}", e)))?;

    config.ensure_valid()?;

    Ok(config)
}

/// Read a JSON config file and validate it.
pub fn load_from_file(path: &Path) -> Result<RunConfig, LoadTestError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LoadTestError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    load_from_str(&content)
}
