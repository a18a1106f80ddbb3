// Batch scheduler module
//
// Splits a run into batches of at most `concurrency` calls. All calls of a
// batch are joined before the next batch starts, so the concurrency limit is
// a hard ceiling, and a fixed delay separates consecutive batches.

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use crate::dispatcher::Dispatch;
use crate::endpoints::{EndpointSelector, EndpointSet};
use crate::error::LoadTestError;
use crate::outcome::OutcomeRecord;
use crate::progress::{NoProgress, ProgressReporter};

/// Number of batches needed for `total` requests: `ceil(total / concurrency)`.
pub fn batch_count(total: u64, concurrency: u64) -> u64 {
    if concurrency == 0 {
        return 0;
    }
    total.div_ceil(concurrency)
}

/// Size of each batch in order. Batch `i` holds
/// `min(concurrency, total - i * concurrency)` requests.
pub fn batch_sizes(total: u64, concurrency: u64) -> impl Iterator<Item = usize> {
    let count = batch_count(total, concurrency);
    (0..count).map(move |i| concurrency.min(total - i * concurrency) as usize)
}

pub struct BatchScheduler {
    concurrency: u64,
    batch_delay: Duration,
}

impl BatchScheduler {
    pub fn new(concurrency: u64, batch_delay: Duration) -> Result<Self, LoadTestError> {
        if concurrency == 0 {
            return Err(LoadTestError::ConfigError(
                "concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            concurrency,
            batch_delay,
        })
    }

    pub fn concurrency(&self) -> u64 {
        self.concurrency
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Issue `total` requests batch by batch, handing each finished batch to
    /// `on_batch`. Returns the number of outcomes produced, which is always
    /// `total`.
    pub async fn run<D, F>(
        &self,
        total: u64,
        dispatcher: &D,
        endpoints: &EndpointSet,
        selector: &mut dyn EndpointSelector,
        progress: &dyn ProgressReporter,
        mut on_batch: F,
    ) -> u64
    where
        D: Dispatch + ?Sized,
        F: FnMut(Vec<OutcomeRecord>),
    {
        let batches = batch_count(total, self.concurrency);
        let mut produced: u64 = 0;
        progress.start(total);

        for (index, size) in batch_sizes(total, self.concurrency).enumerate() {
            let picked = endpoints.pick(selector, size);
            let calls = picked.iter().map(|endpoint| dispatcher.issue(endpoint));

            // Barrier: every call of this batch finishes before we move on.
            let outcomes = join_all(calls).await;

            let completed = outcomes.len() as u64;
            produced += completed;
            debug!(batch = index, size = completed, produced, "batch complete");
            on_batch(outcomes);
            progress.advance(completed);

            if (index as u64) + 1 < batches && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        progress.finish();
        produced
    }

    /// Run and collect every outcome. Intended for tests and small runs.
    pub async fn run_collect<D>(
        &self,
        total: u64,
        dispatcher: &D,
        endpoints: &EndpointSet,
        selector: &mut dyn EndpointSelector,
    ) -> Vec<OutcomeRecord>
    where
        D: Dispatch + ?Sized,
    {
        let mut all = Vec::with_capacity(total as usize);
        self.run(total, dispatcher, endpoints, selector, &NoProgress, |batch| {
            all.extend(batch)
        })
        .await;
        all
    }
}
