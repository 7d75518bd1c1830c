//! # aggregate
//!
//! Per-signal rolling histories (SlotMap-backed).
//!
//! An [`Aggregator`] owns one [`SignalSeries`] per signal it has seen, keyed by a stable
//! [`SeriesKey`]. Series are created lazily on the first observation and iterated in creation
//! order. Cumulative counters are stored relative to their first reading.

use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::decode::Decoder;
use crate::types::{
    config::AggregatorConfig,
    frame::Frame,
    observation::{Observation, Sample},
    series::SignalSeries,
    signal::SignalId,
    value::SignalValue,
};

new_key_type! { pub struct SeriesKey; }

/// Session state: histories, cumulative baselines and the retention policy.
///
/// No global state is involved; build one aggregator per session and hand it to whatever
/// drives the ticks.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,

    // --- Main storage (stable-key map) ---
    series: SlotMap<SeriesKey, SignalSeries>,

    // --- Order "view" ---
    series_order: Vec<SeriesKey>,

    // --- Lookups ---
    series_key_by_signal: HashMap<SignalId, SeriesKey>,

    // Largest timestamp appended across every signal.
    latest_timestamp: Option<f64>,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Stores one observation and evicts what fell out of its series' window.
    ///
    /// The window is measured from the newest timestamp seen across the whole session, so a
    /// signal that stopped transmitting ages out while the others move on. Every series keeps
    /// its own newest sample.
    ///
    /// Returns the stored sample (baseline-adjusted for cumulative signals), or `None` if it
    /// was evicted right away or its timestamp is not finite.
    pub fn append(&mut self, observation: Observation) -> Option<Sample> {
        if !observation.timestamp.is_finite() {
            log::warn!(
                "{}: dropped observation with timestamp {}",
                observation.signal,
                observation.timestamp
            );
            return None;
        }
        let ordering = self.config.ordering;

        self.latest_timestamp = Some(
            self.latest_timestamp
                .map_or(observation.timestamp, |t| t.max(observation.timestamp)),
        );
        let cutoff: Option<f64> = self.session_cutoff();

        let key: SeriesKey = self.add_series_if_absent(observation.signal);
        let series: &mut SignalSeries = self.series.get_mut(key)?;

        let value: SignalValue = match observation.value {
            SignalValue::Number(raw) if observation.signal.is_cumulative() => {
                let baseline: f64 = *series.baseline.get_or_insert(raw);
                SignalValue::Number(raw - baseline)
            }
            other => other,
        };
        let sample: Sample = Sample {
            timestamp: observation.timestamp,
            value,
        };
        series.push(sample, ordering);
        if let Some(cutoff) = cutoff {
            series.evict(cutoff);
        }
        let kept: bool = series
            .samples
            .iter()
            .any(|s| s.timestamp == sample.timestamp);

        kept.then_some(sample)
    }

    /// Appends every observation in order. Returns the number of observations consumed.
    pub fn extend(&mut self, observations: impl IntoIterator<Item = Observation>) -> usize {
        let mut count: usize = 0;
        for obs in observations {
            self.append(obs);
            count += 1;
        }
        count
    }

    /// Read-only snapshot of a signal history; empty when nothing was observed yet.
    ///
    /// Samples behind the session window are left out even if their series has not been
    /// appended to since; the newest sample of the series is always included.
    pub fn current_series(&self, signal: SignalId) -> Vec<Sample> {
        let Some(series) = self.get_series_by_signal(signal) else {
            return Vec::new();
        };
        match self.session_cutoff() {
            Some(cutoff) => series.window(cutoff),
            None => series.to_vec(),
        }
    }

    /// `latest_timestamp - retention`; `None` while unbounded or empty.
    pub fn session_cutoff(&self) -> Option<f64> {
        Some(self.latest_timestamp? - self.config.retention_secs?)
    }

    /// Evicts every series against the session window, including the ones that received
    /// nothing lately.
    pub fn expire(&mut self) {
        let Some(cutoff) = self.session_cutoff() else {
            return;
        };
        for (_, series) in self.series.iter_mut() {
            series.evict(cutoff);
        }
    }

    pub fn get_series_key(&self, signal: SignalId) -> Option<SeriesKey> {
        self.series_key_by_signal.get(&signal).copied()
    }

    pub fn get_series_by_key(&self, key: SeriesKey) -> Option<&SignalSeries> {
        self.series.get(key)
    }

    pub fn get_series_by_signal(&self, signal: SignalId) -> Option<&SignalSeries> {
        self.get_series_by_key(self.get_series_key(signal)?)
    }

    /// Lookup by signal name (case-insensitive, see [`SignalId::name`]).
    pub fn get_series_by_name(&self, name: &str) -> Option<&SignalSeries> {
        self.get_series_by_signal(name.parse().ok()?)
    }

    /// Series in creation order.
    pub fn iter_series(&self) -> impl Iterator<Item = &SignalSeries> + '_ {
        self.series_order
            .iter()
            .filter_map(move |&key| self.series.get(key))
    }

    /// Baseline of a cumulative signal, once its first numeric reading arrived.
    pub fn baseline(&self, signal: SignalId) -> Option<f64> {
        self.get_series_by_signal(signal)?.baseline
    }

    pub fn latest_timestamp(&self) -> Option<f64> {
        self.latest_timestamp
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Forgets every history and baseline (explicit session restart).
    pub fn reset(&mut self) {
        self.series.clear();
        self.series_order.clear();
        self.series_key_by_signal.clear();
        self.latest_timestamp = None;
    }

    fn add_series_if_absent(&mut self, signal: SignalId) -> SeriesKey {
        if let Some(key) = self.get_series_key(signal) {
            return key;
        }
        let key: SeriesKey = self.series.insert(SignalSeries::new(signal));
        self.series_order.push(key);
        self.series_key_by_signal.insert(signal, key);
        key
    }
}

/// Decodes `frames` in order and appends every observation to `aggregator`.
/// Returns the number of observations appended.
///
/// With an unbounded aggregator this yields the whole-log series of a static file.
pub fn decode_frames<'a>(
    frames: impl IntoIterator<Item = &'a Frame>,
    decoder: &Decoder,
    aggregator: &mut Aggregator,
) -> usize {
    let mut count: usize = 0;
    for frame in frames {
        count += aggregator.extend(decoder.decode(frame));
    }
    count
}
