// Dispatcher module - issues one HTTP call and turns it into an OutcomeRecord
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::LoadTestError;
use crate::outcome::OutcomeRecord;

/// Issues a single request for `endpoint` and reports what happened.
///
/// Implementations must never fail: every transport problem is folded into
/// the returned record. They are shared by all calls in a batch, so they
/// must be safe for concurrent use.
pub trait Dispatch: Send + Sync {
    fn issue<'a>(
        &'a self,
        endpoint: &'a str,
    ) -> Pin<Box<dyn Future<Output = OutcomeRecord> + Send + 'a>>;
}

/// Dispatcher backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    target_url: String,
}

impl HttpDispatcher {
    /// Build a dispatcher with its own connection pool.
    pub fn new(target_url: &str, timeout: Option<Duration>) -> Result<Self, LoadTestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LoadTestError::HttpClientError(error_chain(&e)))?;
        Ok(Self::with_client(client, target_url))
    }

    pub fn with_client(client: reqwest::Client, target_url: &str) -> Self {
        Self {
            client,
            target_url: target_url.to_string(),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// The URL is a plain concatenation; no normalisation is applied.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.target_url, endpoint)
    }

    async fn get(&self, endpoint: &str) -> OutcomeRecord {
        let url = self.url_for(endpoint);
        let start = Instant::now();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(endpoint, start, &e),
        };

        let code = response.status().as_u16();
        // Read the whole body so latency covers the transfer and the
        // connection can go back to the pool.
        match response.bytes().await {
            Ok(_) => OutcomeRecord::completed(endpoint, code, start.elapsed().as_secs_f64()),
            Err(e) => transport_failure(endpoint, start, &e),
        }
    }
}

impl Dispatch for HttpDispatcher {
    fn issue<'a>(
        &'a self,
        endpoint: &'a str,
    ) -> Pin<Box<dyn Future<Output = OutcomeRecord> + Send + 'a>> {
        Box::pin(self.get(endpoint))
    }
}

fn transport_failure(endpoint: &str, start: Instant, err: &reqwest::Error) -> OutcomeRecord {
    let latency = start.elapsed().as_secs_f64();
    let message = error_chain(err);
    debug!(endpoint, latency, error = %message, "request failed");
    OutcomeRecord::failed(endpoint, latency, message)
}

/// Render an error together with its `source()` chain.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
