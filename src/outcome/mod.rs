// Outcome record module - the immutable result of one HTTP call
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Text used for the transport-failure sentinel in reports and JSON.
pub const ERROR_SENTINEL: &str = "error";

/// Status of a single call: either the HTTP status code returned by the
/// target, or the transport-failure sentinel.
///
/// Ordering puts every numeric code before `Error`, so sorted histograms
/// list the sentinel last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Code(u16),
    Error,
}

impl Status {
    /// 2xx responses are successes; any other code and the sentinel are not.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Code(code) if (200..300).contains(code))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Code(code) => write!(f, "{}", code),
            Status::Error => f.write_str(ERROR_SENTINEL),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ERROR_SENTINEL {
            return Ok(Status::Error);
        }
        s.parse::<u16>()
            .map(Status::Code)
            .map_err(|_| format!("invalid status '{}'", s))
    }
}

// Serialized as a string so it can key a JSON object.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of one request attempt. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub endpoint: String,
    pub status: Status,
    pub latency_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl OutcomeRecord {
    /// A completed HTTP exchange, whatever its status code.
    pub fn completed(endpoint: impl Into<String>, code: u16, latency_seconds: f64) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: Status::Code(code),
            latency_seconds,
            error_message: None,
        }
    }

    /// A transport-level failure; latency is the time until the failure.
    pub fn failed(
        endpoint: impl Into<String>,
        latency_seconds: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: Status::Error,
            latency_seconds,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
