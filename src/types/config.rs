use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::types::errors::ConfigError;

/// Default retention horizon of a live signal history, in seconds.
pub const DEFAULT_RETENTION_SECS: f64 = 60.0;
/// Default cadence of the external tick driving a live session.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Default minimum spacing between two replayed batches.
pub const DEFAULT_REPLAY_INTERVAL_MS: u64 = 2500;

/// How numeric fields holding the J1939 "not available" pattern are decoded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentinelPolicy {
    /// All-bits-set fields become [`SignalValue::NotAvailable`](crate::SignalValue::NotAvailable).
    #[default]
    Absent,
    /// All-bits-set fields are scaled like any other reading.
    Literal,
}

/// Where a new sample goes in a signal history.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Appended in arrival order. Batches arriving out of order leave the history
    /// locally non-monotonic.
    #[default]
    Arrival,
    /// Inserted after every sample with a timestamp lower or equal to its own.
    Timestamp,
}

/// Settings of one [`Aggregator`](crate::Aggregator).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Maximum age of a sample relative to the newest one of its series.
    /// `None` keeps everything (static log mode).
    pub retention_secs: Option<f64>,
    pub ordering: OrderingPolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            retention_secs: Some(DEFAULT_RETENTION_SECS),
            ordering: OrderingPolicy::default(),
        }
    }
}

impl AggregatorConfig {
    /// Configuration keeping the whole log, used for static files.
    pub fn unbounded() -> Self {
        Self {
            retention_secs: None,
            ..Default::default()
        }
    }
}

/// Settings of a decode/aggregate session, loadable from JSON.
///
/// Every field is optional in the JSON document:
///
/// ```json
/// { "retention_secs": 60.0, "ignore_before": "2020-01-01T00:00:00", "sentinel": "absent" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Retention horizon in seconds; `null` keeps everything.
    pub retention_secs: Option<f64>,
    /// Frames timestamped at or before this instant (UTC) are dropped on ingest.
    pub ignore_before: Option<NaiveDateTime>,
    pub sentinel: SentinelPolicy,
    pub ordering: OrderingPolicy,
    /// Cadence the external scheduler is expected to call `on_tick` with.
    pub poll_interval_ms: u64,
    /// Minimum spacing between two batches of a replay feed.
    pub replay_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retention_secs: Some(DEFAULT_RETENTION_SECS),
            ignore_before: None,
            sentinel: SentinelPolicy::default(),
            ordering: OrderingPolicy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            replay_interval_ms: DEFAULT_REPLAY_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<SessionConfig, ConfigError> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_json_file(path: &str) -> Result<SessionConfig, ConfigError> {
        let text: String = fs::read_to_string(path).map_err(|source| ConfigError::OpenFile {
            path: path.to_string(),
            source,
        })?;
        SessionConfig::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = self.retention_secs
            && (!value.is_finite() || value < 0.0)
        {
            return Err(ConfigError::Retention { value });
        }
        Ok(())
    }

    pub fn aggregator(&self) -> AggregatorConfig {
        AggregatorConfig {
            retention_secs: self.retention_secs,
            ordering: self.ordering,
        }
    }

    /// `ignore_before` as unix seconds.
    pub fn ignore_before_unix(&self) -> Option<f64> {
        self.ignore_before
            .map(|dt| dt.and_utc().timestamp_millis() as f64 / 1000.0)
    }
}
