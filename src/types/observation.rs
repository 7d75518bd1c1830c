use serde::Serialize;

use crate::types::{frame::datetime_from_unix, signal::SignalId, value::SignalValue};

/// One decoded reading taken from one frame.
///
/// A frame may produce several observations (one per signal of its PGN); they all share the
/// frame's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    /// Unix timestamp in seconds, copied from the frame.
    pub timestamp: f64,
    pub signal: SignalId,
    /// Raw decoded value (before any baseline subtraction).
    pub value: SignalValue,
}

impl Observation {
    pub fn new(timestamp: f64, signal: SignalId, value: SignalValue) -> Observation {
        Observation {
            timestamp,
            signal,
            value,
        }
    }
}

/// A stored point of a signal history, ready for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: f64,
    pub value: SignalValue,
}

impl Sample {
    /// Timestamp formatted as `"%Y-%m-%d %H:%M:%S%.3f"` (UTC), empty when out of range.
    pub fn absolute_time(&self) -> String {
        datetime_from_unix(self.timestamp)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_time_is_formatted_in_utc() {
        let s = Sample {
            timestamp: 1637164800.25,
            value: SignalValue::Number(1.0),
        };
        assert_eq!(s.absolute_time(), "2021-11-17 16:00:00.250");
    }

    #[test]
    fn absolute_time_empty_for_non_finite() {
        let s = Sample {
            timestamp: f64::NAN,
            value: SignalValue::NotAvailable,
        };
        assert_eq!(s.absolute_time(), "");
    }
}
