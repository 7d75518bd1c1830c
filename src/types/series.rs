use serde::Serialize;
use std::collections::VecDeque;

use crate::types::{
    config::OrderingPolicy,
    observation::Sample,
    signal::SignalId,
    value::SignalValue,
};

/// Bounded time-series of one decoded signal.
///
/// The most recent sample is mirrored by [`SignalSeries::last`], the full window is in
/// [`SignalSeries::samples`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSeries {
    pub signal: SignalId,
    /// First numeric raw reading of a cumulative signal; `None` until one arrives and always
    /// `None` for non-cumulative signals.
    pub baseline: Option<f64>,
    /// Retained samples (insertion order, see [`OrderingPolicy`]).
    pub samples: VecDeque<Sample>,
    /// Samples ever appended, including evicted ones.
    pub appended: u64,
    // Largest timestamp held; never evicted, so it stays valid across `evict`.
    newest: Option<f64>,
}

impl SignalSeries {
    pub fn new(signal: SignalId) -> Self {
        Self {
            signal,
            baseline: None,
            samples: VecDeque::new(),
            appended: 0,
            newest: None,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Largest timestamp held (not necessarily the last sample under arrival ordering).
    pub fn newest_timestamp(&self) -> Option<f64> {
        self.newest
    }

    /// Snapshot of `(timestamp, value)` pairs for the presentation layer.
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Numeric points for charting; categorical and absent samples are skipped.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .filter_map(|s| s.value.as_f64().map(|v| [s.timestamp, v]))
            .collect()
    }

    /// Value at or just before `ts`. Falls back to the first sample when every sample is later.
    pub fn value_at(&self, ts: f64) -> Option<SignalValue> {
        self.samples
            .iter()
            .rev()
            .find(|s| s.timestamp <= ts)
            .or_else(|| self.samples.front())
            .map(|s| s.value)
    }

    pub(crate) fn push(&mut self, sample: Sample, ordering: OrderingPolicy) {
        match ordering {
            OrderingPolicy::Arrival => self.samples.push_back(sample),
            OrderingPolicy::Timestamp => {
                let at: usize = self
                    .samples
                    .partition_point(|s| s.timestamp <= sample.timestamp);
                self.samples.insert(at, sample);
            }
        }
        self.appended += 1;
        self.newest = Some(self.newest.map_or(sample.timestamp, |t| t.max(sample.timestamp)));
    }

    /// Samples at or after `cutoff`, plus the newest sample even when it is older.
    pub fn window(&self, cutoff: f64) -> Vec<Sample> {
        self.samples
            .iter()
            .filter(|s| kept(s, cutoff, self.newest))
            .copied()
            .collect()
    }

    /// Drops every sample older than `cutoff` except the one holding the newest timestamp.
    ///
    /// Scans the whole window since arrival ordering does not guarantee monotonic timestamps.
    pub(crate) fn evict(&mut self, cutoff: f64) {
        let newest: Option<f64> = self.newest;
        self.samples.retain(|s| kept(s, cutoff, newest));
    }
}

fn kept(sample: &Sample, cutoff: f64, newest: Option<f64>) -> bool {
    sample.timestamp >= cutoff || Some(sample.timestamp) == newest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: f64, v: f64) -> Sample {
        Sample {
            timestamp: ts,
            value: SignalValue::Number(v),
        }
    }

    fn build_series(ordering: OrderingPolicy, points: &[(f64, f64)]) -> SignalSeries {
        let mut series = SignalSeries::new(SignalId::VehicleSpeed);
        for &(ts, v) in points {
            series.push(sample(ts, v), ordering);
        }
        series
    }

    #[test]
    fn arrival_order_keeps_insertion_order() {
        let series = build_series(OrderingPolicy::Arrival, &[(2.0, 2.0), (1.0, 1.0), (3.0, 3.0)]);
        let ts: Vec<f64> = series.samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![2.0, 1.0, 3.0]);
        assert_eq!(series.newest_timestamp(), Some(3.0));
        assert_eq!(series.appended, 3);
    }

    #[test]
    fn timestamp_order_sorts_stably() {
        let series = build_series(
            OrderingPolicy::Timestamp,
            &[(2.0, 2.0), (1.0, 1.0), (2.0, 22.0), (0.5, 0.5)],
        );
        let values: Vec<f64> = series.points().iter().map(|p| p[1]).collect();
        assert_eq!(values, vec![0.5, 1.0, 2.0, 22.0]);
    }

    #[test]
    fn evict_scans_out_of_order_windows() {
        let mut series = build_series(
            OrderingPolicy::Arrival,
            &[(100.0, 1.0), (10.0, 2.0), (95.0, 3.0), (30.0, 4.0)],
        );
        series.evict(90.0);
        let ts: Vec<f64> = series.samples.iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![100.0, 95.0]);
    }

    #[test]
    fn evict_keeps_single_sample() {
        let mut series = build_series(OrderingPolicy::Arrival, &[(100.0, 1.0)]);
        series.evict(500.0);
        assert_eq!(series.len(), 1);
        assert_eq!(series.newest_timestamp(), Some(100.0));
    }

    #[test]
    fn window_keeps_newest_of_a_stale_series() {
        let series = build_series(OrderingPolicy::Arrival, &[(0.0, 1.0), (5.0, 2.0), (10.0, 3.0)]);
        let ts: Vec<f64> = series.window(440.0).iter().map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![10.0]);
        assert_eq!(series.window(4.0).len(), 2);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn value_at_picks_sample_at_or_before() {
        let series = build_series(OrderingPolicy::Arrival, &[(1.0, 10.0), (2.0, 20.0)]);
        assert_eq!(series.value_at(2.0), Some(SignalValue::Number(20.0)));
        assert_eq!(series.value_at(1.5), Some(SignalValue::Number(10.0)));
        assert_eq!(series.value_at(0.5), Some(SignalValue::Number(10.0)));
        assert_eq!(SignalSeries::new(SignalId::EngineSpeed).value_at(1.0), None);
    }
}
