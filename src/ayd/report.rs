//! Ayd's status report and log record model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Target status as reported by Ayd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Healthy,
    Degrade,
    Failure,
    Aborted,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Healthy => "HEALTHY",
            Status::Degrade => "DEGRADE",
            Status::Failure => "FAILURE",
            Status::Aborted => "ABORTED",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One probe result.
///
/// Fields Ayd adds beyond the common ones are kept in `extra` and written back
/// out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time: DateTime<FixedOffset>,
    #[serde(default)]
    pub status: Status,
    /// Milliseconds
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    pub fn latency(&self) -> Duration {
        if self.latency.is_nan() || self.latency <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.latency * 1_000_000.0).round() as u64)
    }

    /// Compact JSON line, as written to Ayd's own log
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeHistory {
    pub target: String,
    #[serde(default)]
    pub status: Status,
    pub updated: DateTime<FixedOffset>,
    /// Oldest first
    #[serde(default)]
    pub records: Vec<Record>,
}

impl ProbeHistory {
    pub fn latest(&self) -> Option<&Record> {
        self.records.last()
    }
}

/// Body of `status.json`
#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub probe_history: BTreeMap<String, ProbeHistory>,
    #[serde(default)]
    pub reported_at: Option<DateTime<FixedOffset>>,
}

impl Report {
    pub fn target(&self, uri: &str) -> Option<&ProbeHistory> {
        self.probe_history.values().find(|h| h.target == uri)
    }
}

/// Body of `log.json`
#[derive(Debug, Clone, Deserialize)]
pub struct LogResponse {
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Filters accepted by `log.json`. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub since: String,
    #[serde(default)]
    pub until: String,
}
