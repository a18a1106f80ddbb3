// Run driver module
//
// Owns the lifecycle of one load run: validates the configuration, builds
// the dispatcher, drives the batch scheduler into the aggregator and turns
// the final state into a summary report.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::config::RunConfig;
use crate::dispatcher::{Dispatch, HttpDispatcher};
use crate::endpoints::{EndpointSelector, EndpointSet, RandomSelector};
use crate::error::LoadTestError;
use crate::progress::ProgressReporter;
use crate::reporter::{summarize, RunInfo, SummaryReport};
use crate::scheduler::BatchScheduler;
use crate::stats::AggregateState;

pub struct Driver {
    config: RunConfig,
    endpoints: EndpointSet,
    scheduler: BatchScheduler,
}

impl Driver {
    /// Validate `config` and prepare a run. Nothing is sent yet.
    pub fn new(config: RunConfig) -> Result<Self, LoadTestError> {
        config.ensure_valid()?;
        let endpoints = config.endpoint_set()?;
        let scheduler = BatchScheduler::new(config.concurrency, config.batch_delay())?;
        Ok(Self {
            config,
            endpoints,
            scheduler,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run against the configured target over HTTP.
    pub async fn run(&self, progress: &dyn ProgressReporter) -> Result<SummaryReport, LoadTestError> {
        let dispatcher =
            HttpDispatcher::new(&self.config.target_url, self.config.request_timeout())?;
        let mut selector = RandomSelector::from_seed_option(self.config.seed);
        Ok(self.run_with(&dispatcher, &mut selector, progress).await)
    }

    /// Run with an explicit dispatcher and selection source. Always
    /// completes, whatever the individual calls return.
    pub async fn run_with<D>(
        &self,
        dispatcher: &D,
        selector: &mut dyn EndpointSelector,
        progress: &dyn ProgressReporter,
    ) -> SummaryReport
    where
        D: Dispatch + ?Sized,
    {
        let total = self.config.total_requests;
        info!(
            target_url = %self.config.target_url,
            total_requests = total,
            concurrency = self.config.concurrency,
            "starting load test"
        );

        let started_at = now_rfc3339();
        let start = Instant::now();

        let mut state = AggregateState::new();
        self.scheduler
            .run(total, dispatcher, &self.endpoints, selector, progress, |batch| {
                state.record_batch(&batch)
            })
            .await;

        let duration_seconds = start.elapsed().as_secs_f64();
        let finished_at = now_rfc3339();

        let report = summarize(&state, duration_seconds).with_run_info(RunInfo {
            target_url: self.config.target_url.clone(),
            concurrency: self.config.concurrency,
            started_at,
            finished_at,
        });

        info!(
            duration_seconds,
            success = report.success_count,
            errors = report.error_count,
            "load test finished"
        );
        report
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
