// Statistics aggregation module

use std::collections::HashMap;

use crate::outcome::{OutcomeRecord, Status};

/// Running totals for a load run.
///
/// Only the coordinating task mutates it, one outcome at a time, after each
/// batch has fully completed. No locking is needed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateState {
    pub success_count: u64,
    pub error_count: u64,
    pub status_histogram: HashMap<Status, u64>,
    /// Latency of every call in seconds, successes and failures alike.
    pub latencies: Vec<f64>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a single outcome into the totals.
    pub fn record(&mut self, outcome: &OutcomeRecord) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        *self.status_histogram.entry(outcome.status).or_insert(0) += 1;
        self.latencies.push(outcome.latency_seconds);
    }

    pub fn record_batch<'a, I>(&mut self, outcomes: I)
    where
        I: IntoIterator<Item = &'a OutcomeRecord>,
    {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    /// Build a state from a complete sequence of outcomes.
    pub fn fold<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a OutcomeRecord>,
    {
        let mut state = Self::new();
        state.record_batch(outcomes);
        state
    }

    pub fn total(&self) -> u64 {
        self.success_count + self.error_count
    }
}

/// Arithmetic mean, 0.0 for no samples.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Index of the `pct` percentile in a sorted slice of `len` samples:
/// `floor(pct / 100 * len)`, clamped to the last element.
/// No interpolation. Returns `None` when there are no samples.
pub fn percentile_index(len: usize, pct: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let idx = (pct / 100.0 * len as f64).floor() as usize;
    Some(idx.min(len - 1))
}

/// Value at the `pct` percentile of unsorted samples, 0.0 when empty.
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    let Some(idx) = percentile_index(samples.len(), pct) else {
        return 0.0;
    };
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[idx]
}
