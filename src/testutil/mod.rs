use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::dispatcher::Dispatch;
use crate::outcome::OutcomeRecord;

/// Scripted dispatcher for tests.
/// - per-endpoint status codes, with a fallback code or "unreachable"
/// - optional per-call delay to force overlap within a batch
/// - call counting and peak in-flight tracking
///
/// Reported latency equals the configured delay, so results are exact.
pub struct MockDispatcher {
    routes: HashMap<String, u16>,
    fallback: Option<u16>,
    delay: Duration,
    endpoint_delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    issued: Mutex<Vec<String>>,
}

impl MockDispatcher {
    fn with_fallback(fallback: Option<u16>) -> Self {
        Self {
            routes: HashMap::new(),
            fallback,
            delay: Duration::ZERO,
            endpoint_delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Every endpoint answers with `code`.
    pub fn always(code: u16) -> Self {
        Self::with_fallback(Some(code))
    }

    /// Every call fails at the transport level.
    pub fn unreachable() -> Self {
        Self::with_fallback(None)
    }

    pub fn with_route(mut self, endpoint: &str, code: u16) -> Self {
        self.routes.insert(endpoint.to_string(), code);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_endpoint_delay(mut self, endpoint: &str, delay: Duration) -> Self {
        self.endpoint_delays.insert(endpoint.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Endpoints in the order calls started.
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }

    async fn respond(&self, endpoint: &str) -> OutcomeRecord {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.issued.lock().unwrap().push(endpoint.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .endpoint_delays
            .get(endpoint)
            .copied()
            .unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let latency = delay.as_secs_f64();
        match self.routes.get(endpoint).copied().or(self.fallback) {
            Some(code) => OutcomeRecord::completed(endpoint, code, latency),
            None => OutcomeRecord::failed(endpoint, latency, "connection refused"),
        }
    }
}

impl Dispatch for MockDispatcher {
    fn issue<'a>(
        &'a self,
        endpoint: &'a str,
    ) -> Pin<Box<dyn Future<Output = OutcomeRecord> + Send + 'a>> {
        Box::pin(self.respond(endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Status;

    #[tokio::test]
    async fn test_routes_override_fallback() {
        let mock = MockDispatcher::always(200).with_route("/missing", 404);
        assert_eq!(mock.issue("/").await.status, Status::Code(200));
        assert_eq!(mock.issue("/missing").await.status, Status::Code(404));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.issued(), vec!["/", "/missing"]);
    }

    #[tokio::test]
    async fn test_unreachable_produces_error_records() {
        let mock = MockDispatcher::unreachable();
        let record = mock.issue("/").await;
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.error_message.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_latency_matches_delay() {
        let mock = MockDispatcher::always(200).with_endpoint_delay("/slow", Duration::from_millis(20));
        let record = mock.issue("/slow").await;
        assert!((record.latency_seconds - 0.02).abs() < 1e-9);
        assert_eq!(mock.peak_in_flight(), 1);
    }
}
