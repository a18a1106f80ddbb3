// Endpoint set and selection sources
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::LoadTestError;

/// Paths exercised when no endpoint list is configured. The last one is
/// expected to return 404 so the error path is always covered.
pub const DEFAULT_ENDPOINTS: [&str; 5] = [
    "/",
    "/products/1",
    "/products/2",
    "/products/3",
    "/products/999",
];

/// Ordered, non-empty list of relative paths. Read-only for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSet {
    paths: Vec<String>,
}

impl EndpointSet {
    pub fn new(paths: Vec<String>) -> Result<Self, LoadTestError> {
        if paths.is_empty() {
            return Err(LoadTestError::ConfigError(
                "endpoint set must not be empty".to_string(),
            ));
        }
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Pick `count` endpoints (with replacement) using `selector`.
    pub fn pick(&self, selector: &mut dyn EndpointSelector, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                let idx = selector.next_index(self.paths.len()) % self.paths.len();
                self.paths[idx].clone()
            })
            .collect()
    }
}

impl Default for EndpointSet {
    fn default() -> Self {
        Self {
            paths: DEFAULT_ENDPOINTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Source of endpoint indices. Implementations decide how a path is chosen
/// for each request; `len` is always at least 1.
pub trait EndpointSelector: Send {
    fn next_index(&mut self, len: usize) -> usize;
}

/// Uniform random selection with replacement.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible selection sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::new(),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointSelector for RandomSelector {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed index sequence, wrapping around at the end.
pub struct SequenceSelector {
    indices: Vec<usize>,
    pos: usize,
}

impl SequenceSelector {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, pos: 0 }
    }

    /// Visits every endpoint in order: 0, 1, 2, ...
    pub fn round_robin() -> Self {
        Self::new(Vec::new())
    }
}

impl EndpointSelector for SequenceSelector {
    fn next_index(&mut self, len: usize) -> usize {
        let idx = if self.indices.is_empty() {
            self.pos % len
        } else {
            self.indices[self.pos % self.indices.len()]
        };
        self.pos += 1;
        idx
    }
}
